pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod types;

// Candidate acquisition: HTTP boundary, site adapters and markup parsing
pub mod app;
pub mod infra;
pub mod parser;
pub mod sites;

// Scoring, ranking and the search facade
pub mod matching;
pub mod pipeline;

pub use config::Config;
pub use error::{Result, ScoutError};
pub use pipeline::{AcquisitionOrchestrator, AcquisitionReport, CandidateSearch, SearchOutcome};
pub use types::{
    CandidateProfile, EmploymentType, ExperienceLevel, ScoreBreakdown, ScoredCandidate, SearchSpecification,
    WorkExperience,
};
