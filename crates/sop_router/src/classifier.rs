//! Maps a workflow status code to the page that should handle the document.
//!
//! Request-form codes are checked before new-creation codes, and anything
//! matching neither set opens the full document view.

use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use shared::domain::{ClassificationResult, Destination, Language, StatusCode, StatusSnapshot};
use thiserror::Error;

/// Statuses handled by the request form, including "11" (returned for correction).
pub const REQUEST_FORM_STATUSES: &[&str] = &["8", "11", "12", "13", "14", "15", "17"];
/// Request-form statuses as the dashboard listing originally routed them, without "11".
pub const LEGACY_REQUEST_FORM_STATUSES: &[&str] = &["8", "12", "13", "14", "15", "17"];
pub const NEW_CREATION_STATUSES: &[&str] = &["16", "1"];

/// Routes a status code under the canonical policy.
pub fn classify(status_code: &StatusCode) -> Destination {
    destination_for(
        status_code,
        |code| REQUEST_FORM_STATUSES.contains(&code),
        |code| NEW_CREATION_STATUSES.contains(&code),
    )
}

fn destination_for(
    status_code: &StatusCode,
    is_request_form: impl Fn(&str) -> bool,
    is_new_creation: impl Fn(&str) -> bool,
) -> Destination {
    let code = status_code.as_str().trim();
    if is_request_form(code) {
        Destination::RequestForm
    } else if is_new_creation(code) {
        Destination::NewCreationForm
    } else {
        Destination::FullDocumentView
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyPreset {
    #[default]
    Canonical,
    Legacy,
}

impl FromStr for PolicyPreset {
    type Err = PolicyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "canonical" => Ok(PolicyPreset::Canonical),
            "legacy" => Ok(PolicyPreset::Legacy),
            other => Err(PolicyError::UnknownPreset(other.to_string())),
        }
    }
}

impl fmt::Display for PolicyPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyPreset::Canonical => f.write_str("canonical"),
            PolicyPreset::Legacy => f.write_str("legacy"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("unknown routing policy '{0}', expected 'canonical' or 'legacy'")]
    UnknownPreset(String),
    #[error("status codes must not be empty")]
    EmptyCode,
    #[error("status codes {codes:?} are listed for both the request form and new creation")]
    Overlap { codes: Vec<String> },
}

/// The two status sets that steer documents away from the full document view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingPolicy {
    request_form: BTreeSet<String>,
    new_creation: BTreeSet<String>,
}

impl Default for RoutingPolicy {
    fn default() -> Self {
        Self::canonical()
    }
}

impl RoutingPolicy {
    pub fn canonical() -> Self {
        Self::from_static(REQUEST_FORM_STATUSES, NEW_CREATION_STATUSES)
    }

    pub fn legacy() -> Self {
        Self::from_static(LEGACY_REQUEST_FORM_STATUSES, NEW_CREATION_STATUSES)
    }

    pub fn preset(preset: PolicyPreset) -> Self {
        match preset {
            PolicyPreset::Canonical => Self::canonical(),
            PolicyPreset::Legacy => Self::legacy(),
        }
    }

    fn from_static(request_form: &[&str], new_creation: &[&str]) -> Self {
        Self {
            request_form: request_form.iter().map(|code| code.to_string()).collect(),
            new_creation: new_creation.iter().map(|code| code.to_string()).collect(),
        }
    }

    /// Builds a policy from explicit code lists. The two sets must be disjoint.
    pub fn from_codes<I, J, S, T>(request_form: I, new_creation: J) -> Result<Self, PolicyError>
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let request_form = normalize_codes(request_form)?;
        let new_creation = normalize_codes(new_creation)?;

        let overlap: Vec<String> = request_form.intersection(&new_creation).cloned().collect();
        if !overlap.is_empty() {
            return Err(PolicyError::Overlap { codes: overlap });
        }

        Ok(Self {
            request_form,
            new_creation,
        })
    }

    pub fn request_form_codes(&self) -> impl Iterator<Item = &str> {
        self.request_form.iter().map(String::as_str)
    }

    pub fn new_creation_codes(&self) -> impl Iterator<Item = &str> {
        self.new_creation.iter().map(String::as_str)
    }

    pub fn classify(&self, status_code: &StatusCode) -> Destination {
        destination_for(
            status_code,
            |code| self.request_form.contains(code),
            |code| self.new_creation.contains(code),
        )
    }

    /// Classification for a status the backend actually returned.
    pub fn classify_status(
        &self,
        status: &StatusSnapshot,
        language: Language,
    ) -> ClassificationResult {
        ClassificationResult {
            destination: self.classify(&status.code),
            status_code: status.code.clone(),
            status_label: status.label(language),
            success: true,
        }
    }
}

fn normalize_codes<I, S>(codes: I) -> Result<BTreeSet<String>, PolicyError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    codes
        .into_iter()
        .map(|code| {
            let code = code.as_ref().trim();
            if code.is_empty() {
                Err(PolicyError::EmptyCode)
            } else {
                Ok(code.to_string())
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/classifier_tests.rs"]
mod tests;
