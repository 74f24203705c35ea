//! Weighted relevance scoring of one candidate against one search.
//!
//! The score is the sum of five independent contributions, each bounded by
//! its weight except experience, which may exceed its weight by up to the
//! bonus cap for over-qualified candidates.

use super::skills::{clean, SkillNormalizer};
use crate::config::ScoringConfig;
use crate::types::{CandidateProfile, ExperienceLevel, ScoreBreakdown, SearchSpecification};
use std::collections::HashSet;
use thiserror::Error;

const DIRECT_MATCH_FACTOR: f64 = 0.7;
const RELATED_MATCH_FACTOR: f64 = 0.3;
const BONUS_PER_LEVEL: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchingWeights {
    pub skills_weight: f64,
    pub position_weight: f64,
    pub experience_weight: f64,
    pub location_weight: f64,
    pub employment_type_weight: f64,
    /// Largest fractional bonus for extra seniority
    pub experience_bonus_cap: f64,
    /// Fraction of the weight lost per missing seniority level
    pub experience_penalty_rate: f64,
    pub clamp_to_hundred: bool,
}

impl Default for MatchingWeights {
    fn default() -> Self {
        Self::from(&ScoringConfig::default())
    }
}

impl From<&ScoringConfig> for MatchingWeights {
    fn from(config: &ScoringConfig) -> Self {
        Self {
            skills_weight: config.skills_weight,
            position_weight: config.position_weight,
            experience_weight: config.experience_weight,
            location_weight: config.location_weight,
            employment_type_weight: config.employment_type_weight,
            experience_bonus_cap: config.experience_bonus_cap,
            experience_penalty_rate: config.experience_penalty_rate,
            clamp_to_hundred: config.clamp_to_hundred,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScoringError {
    #[error("candidate {id} has invalid total experience {years}")]
    InvalidExperience { id: String, years: f64 },

    #[error("score for candidate {id} is not a finite number")]
    NonFiniteScore { id: String },
}

#[derive(Debug)]
pub struct MatchScorer {
    weights: MatchingWeights,
    normalizer: SkillNormalizer,
}

impl Default for MatchScorer {
    fn default() -> Self {
        Self::new(MatchingWeights::default(), SkillNormalizer::new())
    }
}

impl MatchScorer {
    pub fn new(weights: MatchingWeights, normalizer: SkillNormalizer) -> Self {
        Self { weights, normalizer }
    }

    pub fn weights(&self) -> &MatchingWeights {
        &self.weights
    }

    /// Rounded total score
    pub fn score(&self, candidate: &CandidateProfile, spec: &SearchSpecification) -> Result<f64, ScoringError> {
        self.evaluate(candidate, spec).map(|(score, _)| score)
    }

    /// Rounded total together with the per-criterion contributions
    pub fn evaluate(
        &self,
        candidate: &CandidateProfile,
        spec: &SearchSpecification,
    ) -> Result<(f64, ScoreBreakdown), ScoringError> {
        let breakdown = self.breakdown(candidate, spec)?;
        let mut total = breakdown.total();
        if self.weights.clamp_to_hundred {
            total = total.min(100.0);
        }
        Ok((round2(total), breakdown))
    }

    pub fn breakdown(
        &self,
        candidate: &CandidateProfile,
        spec: &SearchSpecification,
    ) -> Result<ScoreBreakdown, ScoringError> {
        let years = candidate.total_experience_years;
        if !years.is_finite() || years < 0.0 {
            return Err(ScoringError::InvalidExperience {
                id: candidate.id.clone(),
                years,
            });
        }

        let breakdown = ScoreBreakdown {
            skills: self.skills_score(&candidate.skills, &spec.keywords),
            position: self.position_score(&candidate.position, spec.position_text()),
            experience: if spec.experience_levels.is_empty() {
                0.0
            } else {
                self.experience_score(ExperienceLevel::from_years(years), &spec.experience_levels)
            },
            location: self.location_score(candidate.location.as_deref(), spec.location_text()),
            employment: match (spec.employment_type, candidate.employment_type) {
                (Some(wanted), Some(offered)) if wanted == offered => self.weights.employment_type_weight,
                _ => 0.0,
            },
        };

        if !breakdown.total().is_finite() {
            return Err(ScoringError::NonFiniteScore {
                id: candidate.id.clone(),
            });
        }
        Ok(breakdown)
    }

    pub fn skills_score(&self, skills: &[String], keywords: &[String]) -> f64 {
        let keywords: HashSet<String> = keywords
            .iter()
            .map(|k| self.normalizer.normalize(k))
            .filter(|k| !k.is_empty())
            .collect();
        if keywords.is_empty() {
            return 0.0;
        }
        let skills: HashSet<String> = skills
            .iter()
            .map(|s| self.normalizer.normalize(s))
            .filter(|s| !s.is_empty())
            .collect();

        let direct = skills.intersection(&keywords).count();
        let related = skills
            .iter()
            .filter(|skill| !keywords.contains(*skill))
            .filter(|skill| {
                keywords
                    .iter()
                    .any(|keyword| keyword.contains(skill.as_str()) || skill.contains(keyword.as_str()))
            })
            .count();

        let ratio = (direct as f64 * DIRECT_MATCH_FACTOR + related as f64 * RELATED_MATCH_FACTOR)
            / keywords.len() as f64;
        ratio * self.weights.skills_weight
    }

    pub fn position_score(&self, candidate_position: &str, wanted: Option<&str>) -> f64 {
        let Some(wanted) = wanted else {
            return 0.0;
        };
        let wanted = clean(wanted);
        if wanted.is_empty() {
            return 0.0;
        }
        let actual = clean(candidate_position);
        if wanted == actual {
            return self.weights.position_weight;
        }

        let wanted_words: HashSet<&str> = wanted.split_whitespace().collect();
        let actual_words: HashSet<&str> = actual.split_whitespace().collect();
        let overlap = wanted_words.intersection(&actual_words).count();
        overlap as f64 / wanted_words.len() as f64 * self.weights.position_weight
    }

    /// Scores seniority against the least senior of the targets
    pub fn experience_score(&self, candidate_level: ExperienceLevel, targets: &[ExperienceLevel]) -> f64 {
        let Some(min_required) = targets.iter().map(|level| level.ordinal()).min() else {
            return 0.0;
        };
        let weight = self.weights.experience_weight;
        let diff = candidate_level.ordinal() as i64 - min_required as i64;

        if diff == 0 {
            weight
        } else if diff > 0 {
            let bonus = (diff as f64 * BONUS_PER_LEVEL).min(self.weights.experience_bonus_cap);
            weight * (1.0 + bonus)
        } else {
            let penalty = diff.unsigned_abs() as f64 * self.weights.experience_penalty_rate;
            (weight * (1.0 - penalty)).max(0.0)
        }
    }

    pub fn location_score(&self, candidate_location: Option<&str>, wanted: Option<&str>) -> f64 {
        let (Some(actual), Some(wanted)) = (candidate_location, wanted) else {
            return 0.0;
        };
        let actual = clean(actual);
        let wanted = clean(wanted);
        if actual.is_empty() || wanted.is_empty() {
            0.0
        } else if actual == wanted {
            self.weights.location_weight
        } else if actual.contains(&wanted) || wanted.contains(&actual) {
            self.weights.location_weight * 0.5
        } else {
            0.0
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EmploymentType;

    fn candidate() -> CandidateProfile {
        CandidateProfile {
            id: "42".to_string(),
            site: "work_ua".to_string(),
            name: "Taras".to_string(),
            position: "Senior Python Developer".to_string(),
            salary_expectation: Some(3000),
            location: Some("Київ".to_string()),
            skills: vec!["Python3".to_string(), "Django".to_string(), "SQL".to_string()],
            employment_type: Some(EmploymentType::FullTime),
            source_url: "https://www.work.ua/resumes/42/".to_string(),
            experience: vec![],
            total_experience_years: 7.0,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_over_qualified_experience_bonus() {
        let scorer = MatchScorer::default();
        let spec = SearchSpecification::new().with_experience_level(ExperienceLevel::TwoToFive);
        let breakdown = scorer.breakdown(&candidate(), &spec).unwrap();
        assert!(approx(breakdown.experience, 38.5));
        assert_eq!(scorer.score(&candidate(), &spec).unwrap(), 38.5);
    }

    #[test]
    fn test_experience_curve_shape() {
        let scorer = MatchScorer::default();
        let target = [ExperienceLevel::TwoToFive];
        let at = |level: ExperienceLevel| scorer.experience_score(level, &target);

        assert!(approx(at(ExperienceLevel::TwoToFive), 35.0));
        assert!(at(ExperienceLevel::FiveToTen) > at(ExperienceLevel::TwoToFive));
        assert!(at(ExperienceLevel::MoreThanTen) > at(ExperienceLevel::FiveToTen));
        assert!(approx(at(ExperienceLevel::MoreThanTen), 35.0 * 1.2));
        assert!(at(ExperienceLevel::OneToTwo) < 35.0);
        assert!(approx(at(ExperienceLevel::OneToTwo), 35.0 * 0.6));
        assert!(approx(at(ExperienceLevel::LessThan1), 35.0 * 0.2));
        assert_eq!(at(ExperienceLevel::NoExperience), 0.0);
    }

    #[test]
    fn test_bonus_plateaus_at_cap() {
        let scorer = MatchScorer::default();
        let target = [ExperienceLevel::NoExperience];
        let two_up = scorer.experience_score(ExperienceLevel::OneToTwo, &target);
        let three_up = scorer.experience_score(ExperienceLevel::TwoToFive, &target);
        let five_up = scorer.experience_score(ExperienceLevel::MoreThanTen, &target);
        assert!(approx(two_up, 35.0 * 1.2));
        assert!(approx(three_up, 35.0 * 1.3));
        assert!(approx(five_up, 35.0 * 1.3));
    }

    #[test]
    fn test_multiple_targets_use_least_senior() {
        let scorer = MatchScorer::default();
        let targets = [ExperienceLevel::FiveToTen, ExperienceLevel::OneToTwo];
        assert!(approx(scorer.experience_score(ExperienceLevel::OneToTwo, &targets), 35.0));
    }

    #[test]
    fn test_empty_keywords_give_zero_skills() {
        let scorer = MatchScorer::default();
        assert_eq!(scorer.skills_score(&candidate().skills, &[]), 0.0);
        let spec = SearchSpecification::new();
        assert_eq!(scorer.breakdown(&candidate(), &spec).unwrap().skills, 0.0);
    }

    #[test]
    fn test_skills_direct_and_related_matches() {
        let scorer = MatchScorer::default();
        // python3 -> python matches directly; "sql" is contained in "postgresql"
        let keywords = vec!["py".to_string(), "Postgres".to_string()];
        let score = scorer.skills_score(&candidate().skills, &keywords);
        assert!(approx(score, 25.0 * (0.7 + 0.3) / 2.0));
    }

    #[test]
    fn test_position_exact_and_partial() {
        let scorer = MatchScorer::default();
        assert!(approx(
            scorer.position_score("Senior Python Developer", Some("senior python developer!")),
            25.0
        ));
        assert!(approx(
            scorer.position_score("Senior Python Developer", Some("Python Engineer")),
            12.5
        ));
        assert_eq!(scorer.position_score("Designer", None), 0.0);
        assert_eq!(scorer.position_score("Designer", Some("???")), 0.0);
    }

    #[test]
    fn test_location_match_levels() {
        let scorer = MatchScorer::default();
        assert!(approx(scorer.location_score(Some("Київ"), Some("київ")), 10.0));
        assert!(approx(scorer.location_score(Some("Київ, Україна"), Some("Київ")), 5.0));
        assert_eq!(scorer.location_score(Some("Львів"), Some("Київ")), 0.0);
        assert_eq!(scorer.location_score(None, Some("Київ")), 0.0);
        assert_eq!(scorer.location_score(Some(""), Some("Київ")), 0.0);
    }

    #[test]
    fn test_full_match_can_exceed_hundred() {
        let scorer = MatchScorer::default();
        let spec = SearchSpecification::new()
            .with_position("Senior Python Developer")
            .with_location("Київ")
            .with_keyword("python")
            .with_experience_level(ExperienceLevel::NoExperience)
            .with_employment_type(EmploymentType::FullTime);
        // skills 17.5 (one direct match), position 25, experience 45.5, location 10, employment 10
        assert_eq!(scorer.score(&candidate(), &spec).unwrap(), 108.0);
    }

    #[test]
    fn test_clamp_to_hundred() {
        let weights = MatchingWeights {
            skills_weight: 60.0,
            clamp_to_hundred: true,
            ..MatchingWeights::default()
        };
        let scorer = MatchScorer::new(weights, SkillNormalizer::new());
        let spec = SearchSpecification::new()
            .with_position("Senior Python Developer")
            .with_keyword("python")
            .with_keyword("django")
            .with_keyword("sql")
            .with_experience_level(ExperienceLevel::NoExperience);
        assert_eq!(scorer.score(&candidate(), &spec).unwrap(), 100.0);
    }

    #[test]
    fn test_invalid_experience_is_scoring_error() {
        let scorer = MatchScorer::default();
        let mut broken = candidate();
        broken.total_experience_years = f64::NAN;
        let result = scorer.score(&broken, &SearchSpecification::new());
        assert!(matches!(result, Err(ScoringError::InvalidExperience { .. })));
    }

    #[test]
    fn test_employment_requires_equality() {
        let scorer = MatchScorer::default();
        let spec = SearchSpecification::new().with_employment_type(EmploymentType::Remote);
        assert_eq!(scorer.breakdown(&candidate(), &spec).unwrap().employment, 0.0);
    }
}
