use super::scorer::{MatchScorer, ScoringError};
use crate::metrics;
use crate::types::{CandidateProfile, ScoredCandidate, SearchSpecification};
use std::cmp::Ordering;
use tracing::{info, instrument, warn};

/// Scores a batch of candidates and orders them best first
#[derive(Debug, Default)]
pub struct RankingPipeline {
    scorer: MatchScorer,
}

impl RankingPipeline {
    pub fn new(scorer: MatchScorer) -> Self {
        Self { scorer }
    }

    pub fn scorer(&self) -> &MatchScorer {
        &self.scorer
    }

    /// Ties keep their input order. A candidate whose scoring faults is kept
    /// with a score of 0 and no breakdown.
    #[instrument(skip_all, fields(candidates = candidates.len()))]
    pub fn rank(&self, candidates: Vec<CandidateProfile>, spec: &SearchSpecification) -> Vec<ScoredCandidate> {
        info!("Starting matching process for {} candidates", candidates.len());

        let mut scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .map(|candidate| match self.scorer.evaluate(&candidate, spec) {
                Ok((score, breakdown)) => ScoredCandidate::new(candidate, score, Some(breakdown)),
                Err(e) => Self::faulted(candidate, &e),
            })
            .collect();

        // Vec::sort_by is stable
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

        metrics::record_candidates_ranked(scored.len());
        info!("Ranked {} candidates based on suitability", scored.len());
        scored
    }

    fn faulted(candidate: CandidateProfile, error: &ScoringError) -> ScoredCandidate {
        warn!(candidate_id = %candidate.id, site = %candidate.site, "Error scoring candidate: {}", error);
        metrics::record_scoring_fault();
        ScoredCandidate::new(candidate, 0.0, None)
    }
}
