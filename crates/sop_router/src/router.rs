use std::sync::Arc;

use serde::Serialize;
use shared::domain::{ClassificationResult, HeaderId, Language};
use tracing::{info, warn};

use crate::{
    classifier::RoutingPolicy,
    lookup::DocumentLookup,
    navigation::{NavigationTarget, Navigator},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutedDocument {
    pub classification: ClassificationResult,
    pub target: NavigationTarget,
}

/// Looks up a document's status, classifies it, and hands the decision to a navigator.
///
/// Neither `resolve` nor `route` fails: a status that cannot be fetched is
/// logged and the document opens in the full document view.
pub struct StatusRouter {
    lookup: Arc<dyn DocumentLookup>,
    navigator: Arc<dyn Navigator>,
    policy: RoutingPolicy,
    language: Language,
}

impl StatusRouter {
    pub fn new(lookup: Arc<dyn DocumentLookup>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            lookup,
            navigator,
            policy: RoutingPolicy::default(),
            language: Language::default(),
        }
    }

    pub fn with_policy(mut self, policy: RoutingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn policy(&self) -> &RoutingPolicy {
        &self.policy
    }

    pub async fn resolve(&self, header_id: &HeaderId) -> ClassificationResult {
        match self.lookup.fetch_status(header_id).await {
            Ok(status) => {
                let result = self.policy.classify_status(&status, self.language);
                info!(
                    header_id = %header_id,
                    status_code = %result.status_code,
                    destination = %result.destination,
                    "sop routing: status classified"
                );
                result
            }
            Err(err) => {
                warn!(
                    header_id = %header_id,
                    malformed_response = err.is_malformed_response(),
                    "sop routing: status lookup failed, opening full document view: {err}"
                );
                ClassificationResult::lookup_failed()
            }
        }
    }

    pub async fn route(&self, header_id: &HeaderId) -> RoutedDocument {
        let classification = self.resolve(header_id).await;
        let target = self.navigator.navigate(classification.destination, header_id);
        RoutedDocument {
            classification,
            target,
        }
    }
}

#[cfg(test)]
#[path = "tests/router_tests.rs"]
mod tests;
