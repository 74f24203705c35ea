use crate::app::ports::HttpClientPort;
use crate::config::Config;
use crate::metrics;
use crate::sites::{create_adapters, CandidateRef, SiteAdapter};
use crate::types::{CandidateProfile, SearchSpecification};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, instrument, warn};

/// Outcome of one site's share of an acquisition run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SiteReport {
    pub site: &'static str,
    pub listed: usize,
    pub acquired: usize,
    /// Listed candidates whose profile failed or lacked required fields
    pub dropped: usize,
    pub listing_failed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AcquisitionReport {
    pub page: u32,
    pub sites: Vec<SiteReport>,
}

impl AcquisitionReport {
    pub fn total_listed(&self) -> usize {
        self.sites.iter().map(|s| s.listed).sum()
    }

    pub fn total_acquired(&self) -> usize {
        self.sites.iter().map(|s| s.acquired).sum()
    }

    /// True when every configured site failed to return its listing page
    pub fn all_sources_failed(&self) -> bool {
        !self.sites.is_empty() && self.sites.iter().all(|s| s.listing_failed)
    }
}

/// Drives every enabled site adapter for one results page at a time.
///
/// Sites are queried concurrently and their results concatenated in adapter
/// order. Profile fetches share one semaphore, so at most
/// `max_concurrent_fetches` profile requests are in flight across all sites.
pub struct AcquisitionOrchestrator {
    adapters: Vec<Arc<dyn SiteAdapter>>,
    fetch_permits: Arc<Semaphore>,
    page: u32,
}

impl AcquisitionOrchestrator {
    pub fn new(adapters: Vec<Arc<dyn SiteAdapter>>, max_concurrent_fetches: usize) -> Self {
        Self {
            adapters,
            fetch_permits: Arc::new(Semaphore::new(max_concurrent_fetches.clamp(1, Semaphore::MAX_PERMITS))),
            page: 1,
        }
    }

    pub fn from_config(config: &Config, http: Arc<dyn HttpClientPort>) -> Self {
        let adapters = create_adapters(config.acquisition.sites.as_slice(), http);
        if adapters.is_empty() {
            warn!("No known sites configured; acquisition will return nothing");
        }
        Self::new(adapters, config.acquisition.max_concurrent_fetches)
    }

    pub fn sites(&self) -> Vec<&'static str> {
        self.adapters.iter().map(|a| a.site_name()).collect()
    }

    pub fn current_page(&self) -> u32 {
        self.page
    }

    /// Advances every site to the next results page
    pub fn next_page(&mut self) -> u32 {
        self.page = self.page.saturating_add(1);
        self.page
    }

    pub fn reset_page(&mut self) {
        self.page = 1;
    }

    /// Starts subsequent searches at `page` (1-based; 0 is treated as 1)
    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub async fn acquire(&self, spec: &SearchSpecification) -> Vec<CandidateProfile> {
        self.acquire_with_report(spec).await.0
    }

    #[instrument(skip(self, spec), fields(page = self.page))]
    pub async fn acquire_with_report(&self, spec: &SearchSpecification) -> (Vec<CandidateProfile>, AcquisitionReport) {
        let page = self.page;
        info!("Acquiring candidates from {} sites", self.adapters.len());

        let per_site = join_all(
            self.adapters
                .iter()
                .map(|adapter| self.acquire_site(adapter.as_ref(), spec, page)),
        )
        .await;

        let mut candidates = Vec::new();
        let mut report = AcquisitionReport {
            page,
            sites: Vec::with_capacity(per_site.len()),
        };
        for (profiles, site_report) in per_site {
            candidates.extend(profiles);
            report.sites.push(site_report);
        }

        if report.all_sources_failed() {
            error!("All {} sources failed to return a listing", report.sites.len());
        } else {
            info!(
                "Acquired {} of {} listed candidates",
                report.total_acquired(),
                report.total_listed()
            );
        }
        (candidates, report)
    }

    async fn acquire_site(
        &self,
        adapter: &dyn SiteAdapter,
        spec: &SearchSpecification,
        page: u32,
    ) -> (Vec<CandidateProfile>, SiteReport) {
        let site = adapter.site_name();
        let mut report = SiteReport {
            site,
            ..SiteReport::default()
        };

        let url = adapter.build_query(spec, page);
        debug!(site, url = %url, "Fetching listing");
        let Some(refs) = adapter.try_fetch_listing(&url).await else {
            report.listing_failed = true;
            return (Vec::new(), report);
        };
        report.listed = refs.len();
        metrics::record_candidates_listed(site, refs.len());

        let fetched = join_all(refs.iter().map(|candidate| self.fetch_profile(adapter, candidate))).await;

        let profiles: Vec<CandidateProfile> = fetched
            .into_iter()
            .flatten()
            .filter(|profile| {
                let complete = profile.is_complete();
                if !complete {
                    debug!(site, candidate_id = %profile.id, "Dropping incomplete profile");
                    metrics::record_extraction_fault(site, "required_fields");
                }
                complete
            })
            .collect();

        report.acquired = profiles.len();
        report.dropped = report.listed - report.acquired;
        metrics::record_candidates_acquired(site, profiles.len());
        info!(site, "Acquired {}/{} profiles", report.acquired, report.listed);
        (profiles, report)
    }

    async fn fetch_profile(&self, adapter: &dyn SiteAdapter, candidate: &CandidateRef) -> Option<CandidateProfile> {
        let _permit = self.fetch_permits.acquire().await.ok()?;
        adapter.fetch_profile(candidate).await
    }
}
