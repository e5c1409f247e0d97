//! Status-driven routing for SOP documents.
//!
//! A document's workflow status decides whether it opens in the request
//! form, the new-creation form, or the full document view.

use anyhow::{bail, Context, Result};
use url::Url;

pub mod classifier;
pub mod lookup;
pub mod navigation;
pub mod router;

pub use classifier::{classify, PolicyError, PolicyPreset, RoutingPolicy};
pub use lookup::{DocumentLookup, SopHeaderClient};
pub use navigation::{NavigationTarget, Navigator, PathTemplates, UrlNavigator};
pub use router::{RoutedDocument, StatusRouter};

pub(crate) fn parse_base_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    let url = Url::parse(raw).with_context(|| format!("failed to parse url '{raw}'"))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        bail!("url '{raw}' must be an http(s) base url");
    }
    Ok(url)
}
