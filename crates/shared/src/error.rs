use thiserror::Error;

/// Why a document's workflow status could not be obtained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("server returned HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },
    #[error("invalid sop header payload: {0}")]
    Decode(String),
    #[error("sop header {header_id} has no status")]
    MissingStatus { header_id: String },
    #[error("status of sop header {header_id} has no id")]
    MissingStatusId { header_id: String },
}

impl LookupError {
    /// True for failures caused by the payload rather than the transport.
    pub fn is_malformed_response(&self) -> bool {
        matches!(
            self,
            LookupError::Decode(_)
                | LookupError::MissingStatus { .. }
                | LookupError::MissingStatusId { .. }
        )
    }
}
