use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_newtype!(HeaderId);
string_newtype!(StatusCode);

impl StatusCode {
    /// Status code used when the backend gave us nothing to classify.
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Builds a status code from raw backend text, dropping surrounding whitespace.
    pub fn normalized(raw: &str) -> Self {
        Self(raw.trim().to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Page that handles a document in its current workflow position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    RequestForm,
    NewCreationForm,
    FullDocumentView,
}

impl Destination {
    pub const ALL: [Destination; 3] = [
        Destination::RequestForm,
        Destination::NewCreationForm,
        Destination::FullDocumentView,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Destination::RequestForm => "request_form",
            Destination::NewCreationForm => "new_creation_form",
            Destination::FullDocumentView => "full_document_view",
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "ar" | "arabic" => Ok(Language::Ar),
            other => Err(format!("unsupported language '{other}', expected 'en' or 'ar'")),
        }
    }
}

/// Workflow status of a document as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub code: StatusCode,
    pub name_en: Option<String>,
    pub name_ar: Option<String>,
}

impl StatusSnapshot {
    /// Display name in `language`, falling back to the other language and
    /// finally to the raw code.
    pub fn label(&self, language: Language) -> String {
        let (preferred, other) = match language {
            Language::En => (&self.name_en, &self.name_ar),
            Language::Ar => (&self.name_ar, &self.name_en),
        };
        preferred
            .as_deref()
            .or(other.as_deref())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.code.to_string())
    }
}

pub const ERROR_STATUS_LABEL: &str = "Error";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub destination: Destination,
    pub status_code: StatusCode,
    pub status_label: String,
    pub success: bool,
}

impl ClassificationResult {
    /// Result used whenever the status could not be looked up.
    pub fn lookup_failed() -> Self {
        Self {
            destination: Destination::FullDocumentView,
            status_code: StatusCode::empty(),
            status_label: ERROR_STATUS_LABEL.to_string(),
            success: false,
        }
    }
}
