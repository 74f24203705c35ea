//! Acquisition across sites and the search facade built on top of it.

pub mod orchestrator;
pub mod search;

pub use orchestrator::{AcquisitionOrchestrator, AcquisitionReport, SiteReport};
pub use search::{CandidateSearch, SearchOutcome};
