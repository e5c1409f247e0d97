use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use shared::domain::{Destination, HeaderId};
use url::Url;

use crate::parse_base_url;

pub const HEADER_ID_QUERY_PARAM: &str = "headerId";

/// Performs the page transition for a routing decision.
pub trait Navigator: Send + Sync {
    fn navigate(&self, destination: Destination, header_id: &HeaderId) -> NavigationTarget;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationTarget {
    pub destination: Destination,
    pub header_id: HeaderId,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathTemplates {
    pub request_form: String,
    pub new_creation_form: String,
    pub full_document_view: String,
}

impl Default for PathTemplates {
    fn default() -> Self {
        Self {
            request_form: "/sop/request-form".into(),
            new_creation_form: "/sop/new-creation".into(),
            full_document_view: "/sop/full-document".into(),
        }
    }
}

impl PathTemplates {
    pub fn path_for(&self, destination: Destination) -> &str {
        match destination {
            Destination::RequestForm => &self.request_form,
            Destination::NewCreationForm => &self.new_creation_form,
            Destination::FullDocumentView => &self.full_document_view,
        }
    }

    fn validate(&self) -> Result<()> {
        for destination in Destination::ALL {
            let path = self.path_for(destination);
            if path.trim().is_empty() {
                bail!("path template for {destination} must not be empty");
            }
            if path.contains(['?', '#']) {
                bail!("path template for {destination} must not carry a query or fragment: '{path}'");
            }
        }
        Ok(())
    }
}

/// Builds in-app page URLs that carry the header id as a query parameter.
#[derive(Debug, Clone)]
pub struct UrlNavigator {
    app_base_url: Url,
    templates: PathTemplates,
}

impl UrlNavigator {
    pub fn new(app_base_url: &str) -> Result<Self> {
        Self::with_templates(app_base_url, PathTemplates::default())
    }

    pub fn with_templates(app_base_url: &str, templates: PathTemplates) -> Result<Self> {
        let app_base_url = parse_base_url(app_base_url).context("invalid app base url")?;
        templates.validate()?;
        Ok(Self {
            app_base_url,
            templates,
        })
    }

    pub fn url_for(&self, destination: Destination, header_id: &HeaderId) -> Url {
        let mut url = self.app_base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(
                self.templates
                    .path_for(destination)
                    .split('/')
                    .filter(|segment| !segment.is_empty()),
            );
        }
        url.query_pairs_mut()
            .append_pair(HEADER_ID_QUERY_PARAM, header_id.as_str());
        url
    }
}

impl Navigator for UrlNavigator {
    fn navigate(&self, destination: Destination, header_id: &HeaderId) -> NavigationTarget {
        NavigationTarget {
            destination,
            header_id: header_id.clone(),
            url: self.url_for(destination, header_id).to_string(),
        }
    }
}
