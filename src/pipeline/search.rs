use super::orchestrator::{AcquisitionOrchestrator, AcquisitionReport};
use crate::app::ports::HttpClientPort;
use crate::config::Config;
use crate::error::Result;
use crate::infra::http_client::ReqwestHttp;
use crate::matching::{MatchScorer, MatchingWeights, RankingPipeline, SkillNormalizer};
use crate::types::{ScoredCandidate, SearchSpecification};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    /// Best match first
    pub ranked: Vec<ScoredCandidate>,
    pub report: AcquisitionReport,
    pub page: u32,
}

/// Acquires one page of candidates from every site and ranks them.
///
/// The page counter lives in the orchestrator; call [`next_page`](Self::next_page)
/// between searches to walk through results.
pub struct CandidateSearch {
    orchestrator: AcquisitionOrchestrator,
    ranking: RankingPipeline,
}

impl CandidateSearch {
    pub fn new(orchestrator: AcquisitionOrchestrator, ranking: RankingPipeline) -> Self {
        Self { orchestrator, ranking }
    }

    pub fn from_config(config: &Config, http: Arc<dyn HttpClientPort>) -> Self {
        let scorer = MatchScorer::new(
            MatchingWeights::from(&config.scoring),
            SkillNormalizer::with_synonyms(&config.skills.synonyms),
        );
        Self::new(
            AcquisitionOrchestrator::from_config(config, http),
            RankingPipeline::new(scorer),
        )
    }

    /// Builds the search over a live reqwest client
    pub fn connect(config: &Config) -> Result<Self> {
        let http = ReqwestHttp::new(&config.http)?;
        Ok(Self::from_config(config, Arc::new(http)))
    }

    #[instrument(skip_all, fields(page = self.orchestrator.current_page()))]
    pub async fn search(&self, spec: &SearchSpecification) -> SearchOutcome {
        let (candidates, report) = self.orchestrator.acquire_with_report(spec).await;
        let ranked = self.ranking.rank(candidates, spec);
        info!("Search returned {} ranked candidates", ranked.len());
        SearchOutcome {
            ranked,
            page: report.page,
            report,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.orchestrator.current_page()
    }

    pub fn next_page(&mut self) -> u32 {
        self.orchestrator.next_page()
    }

    pub fn reset_page(&mut self) {
        self.orchestrator.reset_page();
    }

    pub fn set_page(&mut self, page: u32) {
        self.orchestrator.set_page(page);
    }

    pub fn orchestrator(&self) -> &AcquisitionOrchestrator {
        &self.orchestrator
    }

    pub fn ranking(&self) -> &RankingPipeline {
        &self.ranking
    }
}
