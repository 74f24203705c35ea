//! Per-site adapters: URL grammar, listing extraction and profile parsing.
//!
//! Each job board is one [`SiteAdapter`] implementation. Orchestration code
//! only sees the trait, so adding a board means adding a module here and a
//! match arm in [`factory`].

pub mod factory;
pub mod robota_ua;
pub mod work_ua;

pub use factory::{create_adapter, create_adapters};
pub use robota_ua::RobotaUaAdapter;
pub use work_ua::WorkUaAdapter;

use crate::app::ports::HttpClientPort;
use crate::metrics::{self, FetchStage};
use crate::types::{CandidateProfile, SearchSpecification};
use async_trait::async_trait;
use tracing::warn;

/// Opaque handle to one candidate found on a listing page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidateRef {
    pub site: &'static str,
    pub id: String,
    pub url: String,
}

#[async_trait]
pub trait SiteAdapter: Send + Sync {
    fn site_name(&self) -> &'static str;

    /// Search URL for a 1-based page. Pure; filters absent from `spec` are omitted.
    fn build_query(&self, spec: &SearchSpecification, page: u32) -> String;

    /// Candidates listed at `url`, or `None` when the page could not be fetched.
    /// A page without recognizable markup yields an empty list.
    async fn try_fetch_listing(&self, url: &str) -> Option<Vec<CandidateRef>>;

    /// Candidates listed at `url`; empty on any transport or markup failure
    async fn fetch_listing(&self, url: &str) -> Vec<CandidateRef> {
        self.try_fetch_listing(url).await.unwrap_or_default()
    }

    /// Full profile, or `None` when required fields are missing or the fetch fails
    async fn fetch_profile(&self, candidate: &CandidateRef) -> Option<CandidateProfile>;
}

/// GETs `url`, absorbing transport faults into `None`
pub(crate) async fn fetch_html(
    http: &dyn HttpClientPort,
    site: &'static str,
    url: &str,
    stage: FetchStage,
) -> Option<String> {
    match http.get(url).await {
        Ok(resp) if resp.is_success() => Some(resp.body),
        Ok(resp) => {
            warn!(site, url, status = resp.status, "Failed to fetch {} page", stage.as_str());
            metrics::record_transport_fault(site, stage);
            None
        }
        Err(e) => {
            warn!(site, url, "Network error fetching {} page: {}", stage.as_str(), e);
            metrics::record_transport_fault(site, stage);
            None
        }
    }
}

/// Lower-cased URL path segment with words joined by `separator`.
///
/// Returns `None` when nothing usable is left, so the caller can drop the
/// segment instead of emitting an empty one.
pub(crate) fn path_slug(text: &str, separator: &str) -> Option<String> {
    let words: Vec<String> = text
        .to_lowercase()
        .split_whitespace()
        .map(|word| {
            let kept: String = word
                .chars()
                .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
                .collect();
            url::form_urlencoded::byte_serialize(kept.as_bytes()).collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect();
    if words.is_empty() {
        None
    } else {
        Some(words.join(separator))
    }
}

/// Last non-empty path segment of an href, ignoring any query string
pub(crate) fn last_path_segment(href: &str) -> Option<&str> {
    href.split(['?', '#'])
        .next()?
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
}
