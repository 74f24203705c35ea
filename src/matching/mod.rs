pub mod ranking;
pub mod scorer;
pub mod skills;

pub use ranking::RankingPipeline;
pub use scorer::{MatchScorer, MatchingWeights, ScoringError};
pub use skills::SkillNormalizer;
