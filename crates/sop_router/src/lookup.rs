use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::{HeaderId, StatusSnapshot},
    error::LookupError,
    protocol::{SopHeaderResponse, SOP_HEADER_BY_ID_PATH},
};
use tracing::debug;
use url::Url;

use crate::parse_base_url;

/// Source of a document's current workflow status.
#[async_trait]
pub trait DocumentLookup: Send + Sync {
    async fn fetch_status(&self, header_id: &HeaderId) -> Result<StatusSnapshot, LookupError>;
}

/// Reads SOP header status from the QMS REST backend.
#[derive(Debug, Clone)]
pub struct SopHeaderClient {
    http: Client,
    api_base_url: Url,
}

impl SopHeaderClient {
    pub fn new(api_base_url: &str) -> Result<Self> {
        Self::with_timeout(api_base_url, None)
    }

    /// Without a timeout, requests use the HTTP client's defaults.
    pub fn with_timeout(api_base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("failed to build sop header http client")?;
        let api_base_url = parse_base_url(api_base_url).context("invalid api base url")?;
        Ok(Self { http, api_base_url })
    }

    pub fn header_url(&self, header_id: &HeaderId) -> Url {
        let mut url = self.api_base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(SOP_HEADER_BY_ID_PATH.split('/').filter(|s| !s.is_empty()))
                .push(header_id.as_str());
        }
        url
    }
}

#[async_trait]
impl DocumentLookup for SopHeaderClient {
    async fn fetch_status(&self, header_id: &HeaderId) -> Result<StatusSnapshot, LookupError> {
        let url = self.header_url(header_id);
        debug!(header_id = %header_id, url = %url, "sop lookup: fetching header");

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|err| request_error(&url, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let header: SopHeaderResponse = response.json().await.map_err(|err| {
            if err.is_timeout() {
                LookupError::Timeout {
                    url: url.to_string(),
                }
            } else {
                LookupError::Decode(err.to_string())
            }
        })?;
        header.into_status(header_id)
    }
}

fn request_error(url: &Url, err: reqwest::Error) -> LookupError {
    if err.is_timeout() {
        LookupError::Timeout {
            url: url.to_string(),
        }
    } else {
        LookupError::Transport {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "tests/lookup_tests.rs"]
mod tests;
