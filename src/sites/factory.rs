use super::{RobotaUaAdapter, SiteAdapter, WorkUaAdapter};
use crate::app::ports::HttpClientPort;
use crate::constants::*;
use std::sync::Arc;
use tracing::warn;

/// Factory function to create a site adapter by name or alias
pub fn create_adapter(site: &str, http: Arc<dyn HttpClientPort>) -> Option<Arc<dyn SiteAdapter>> {
    match site_alias_to_name(site).as_str() {
        WORK_UA_SITE => Some(Arc::new(WorkUaAdapter::new(http))),
        ROBOTA_UA_SITE => Some(Arc::new(RobotaUaAdapter::new(http))),
        _ => None,
    }
}

/// Adapters for `sites` in the given order, skipping unknown names
pub fn create_adapters<S: AsRef<str>>(sites: &[S], http: Arc<dyn HttpClientPort>) -> Vec<Arc<dyn SiteAdapter>> {
    sites
        .iter()
        .filter_map(|site| {
            let adapter = create_adapter(site.as_ref(), http.clone());
            if adapter.is_none() {
                warn!("Unknown site '{}', skipping", site.as_ref());
            }
            adapter
        })
        .collect()
}
