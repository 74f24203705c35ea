//! Fault and throughput counters for the acquisition and ranking stages.
//!
//! Every absorbed fault is counted here as well as logged, so a run that
//! returns few candidates can be told apart from one where sources failed.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    TransportFaults,
    ExtractionFaults,
    ValueFaults,
    ScoringFaults,
    CandidatesListed,
    CandidatesAcquired,
    CandidatesRanked,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::TransportFaults => "talent_scout_transport_faults_total",
            MetricName::ExtractionFaults => "talent_scout_extraction_faults_total",
            MetricName::ValueFaults => "talent_scout_value_faults_total",
            MetricName::ScoringFaults => "talent_scout_scoring_faults_total",
            MetricName::CandidatesListed => "talent_scout_candidates_listed_total",
            MetricName::CandidatesAcquired => "talent_scout_candidates_acquired_total",
            MetricName::CandidatesRanked => "talent_scout_candidates_ranked_total",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which request a transport fault interrupted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStage {
    Listing,
    Profile,
}

impl FetchStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchStage::Listing => "listing",
            FetchStage::Profile => "profile",
        }
    }
}

pub fn record_transport_fault(site: &'static str, stage: FetchStage) {
    metrics::counter!(
        MetricName::TransportFaults.as_str(),
        "site" => site,
        "stage" => stage.as_str()
    )
    .increment(1);
}

pub fn record_extraction_fault(site: &'static str, field: &'static str) {
    metrics::counter!(MetricName::ExtractionFaults.as_str(), "site" => site, "field" => field)
        .increment(1);
}

pub fn record_value_fault(site: &'static str, field: &'static str) {
    metrics::counter!(MetricName::ValueFaults.as_str(), "site" => site, "field" => field)
        .increment(1);
}

pub fn record_scoring_fault() {
    metrics::counter!(MetricName::ScoringFaults.as_str()).increment(1);
}

pub fn record_candidates_listed(site: &'static str, count: usize) {
    metrics::counter!(MetricName::CandidatesListed.as_str(), "site" => site).increment(count as u64);
}

pub fn record_candidates_acquired(site: &'static str, count: usize) {
    metrics::counter!(MetricName::CandidatesAcquired.as_str(), "site" => site)
        .increment(count as u64);
}

pub fn record_candidates_ranked(count: usize) {
    metrics::counter!(MetricName::CandidatesRanked.as_str()).increment(count as u64);
}
