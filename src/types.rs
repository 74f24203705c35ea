use crate::error::ScoutError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Seniority bucket, ordered from least to most experienced
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    NoExperience,
    #[serde(rename = "less_than_1")]
    LessThan1,
    OneToTwo,
    TwoToFive,
    FiveToTen,
    MoreThanTen,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 6] = [
        ExperienceLevel::NoExperience,
        ExperienceLevel::LessThan1,
        ExperienceLevel::OneToTwo,
        ExperienceLevel::TwoToFive,
        ExperienceLevel::FiveToTen,
        ExperienceLevel::MoreThanTen,
    ];

    /// Buckets a tenure in years using the 0 / 1 / 2 / 5 / 10 thresholds
    pub fn from_years(years: f64) -> Self {
        if years <= 0.0 {
            ExperienceLevel::NoExperience
        } else if years < 1.0 {
            ExperienceLevel::LessThan1
        } else if years < 2.0 {
            ExperienceLevel::OneToTwo
        } else if years < 5.0 {
            ExperienceLevel::TwoToFive
        } else if years < 10.0 {
            ExperienceLevel::FiveToTen
        } else {
            ExperienceLevel::MoreThanTen
        }
    }

    /// Zero-based position in the seniority order
    pub fn ordinal(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExperienceLevel::NoExperience => "no_experience",
            ExperienceLevel::LessThan1 => "less_than_1",
            ExperienceLevel::OneToTwo => "one_to_two",
            ExperienceLevel::TwoToFive => "two_to_five",
            ExperienceLevel::FiveToTen => "five_to_ten",
            ExperienceLevel::MoreThanTen => "more_than_ten",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExperienceLevel {
    type Err = ScoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace('-', "_");
        ExperienceLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == key)
            .ok_or_else(|| ScoutError::InvalidValue(format!("unknown experience level '{}'", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Remote,
}

impl EmploymentType {
    pub fn as_str(self) -> &'static str {
        match self {
            EmploymentType::FullTime => "full_time",
            EmploymentType::PartTime => "part_time",
            EmploymentType::Remote => "remote",
        }
    }
}

impl fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EmploymentType {
    type Err = ScoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "full_time" => Ok(EmploymentType::FullTime),
            "part_time" => Ok(EmploymentType::PartTime),
            "remote" => Ok(EmploymentType::Remote),
            _ => Err(ScoutError::InvalidValue(format!("unknown employment type '{}'", s))),
        }
    }
}

/// Filter and ranking criteria for one search request.
///
/// Passed by reference through acquisition, scoring and pagination; nothing
/// in the crate keeps a copy between requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchSpecification {
    pub position: Option<String>,
    pub location: Option<String>,
    /// Empty means "no experience filter"; several entries form an ordered set
    #[serde(default)]
    pub experience_levels: Vec<ExperienceLevel>,
    pub min_salary: Option<u32>,
    pub max_salary: Option<u32>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub employment_type: Option<EmploymentType>,
}

impl SearchSpecification {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_experience_level(mut self, level: ExperienceLevel) -> Self {
        if !self.experience_levels.contains(&level) {
            self.experience_levels.push(level);
        }
        self
    }

    pub fn with_salary_range(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.min_salary = min;
        self.max_salary = max;
        self
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        if !self.keywords.contains(&keyword) {
            self.keywords.push(keyword);
        }
        self
    }

    pub fn with_employment_type(mut self, employment_type: EmploymentType) -> Self {
        self.employment_type = Some(employment_type);
        self
    }

    /// Position with surrounding whitespace removed, `None` when blank
    pub fn position_text(&self) -> Option<&str> {
        non_blank(self.position.as_deref())
    }

    /// Location with surrounding whitespace removed, `None` when blank
    pub fn location_text(&self) -> Option<&str> {
        non_blank(self.location.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkExperience {
    pub position: String,
    pub company: String,
    pub duration_months: u32,
    /// First day of the starting month
    pub start_date: NaiveDate,
    /// `None` for an ongoing role
    pub end_date: Option<NaiveDate>,
    pub is_current: bool,
    pub description: Option<String>,
    pub industry: Option<String>,
    pub city: Option<String>,
}

/// Normalized resume record scraped from one job board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub id: String,
    pub site: String,
    pub name: String,
    pub position: String,
    pub salary_expectation: Option<u32>,
    pub location: Option<String>,
    pub skills: Vec<String>,
    pub employment_type: Option<EmploymentType>,
    pub source_url: String,
    pub experience: Vec<WorkExperience>,
    pub total_experience_years: f64,
}

impl CandidateProfile {
    /// True when every field acquisition requires is non-empty
    pub fn is_complete(&self) -> bool {
        ![&self.id, &self.name, &self.position, &self.source_url]
            .iter()
            .any(|field| field.trim().is_empty())
    }

    /// Most recent role: an ongoing one if present, otherwise the latest end date
    pub fn latest_position(&self) -> Option<&WorkExperience> {
        self.experience.iter().max_by_key(|exp| {
            (
                exp.is_current,
                exp.end_date.unwrap_or(exp.start_date),
                exp.start_date,
            )
        })
    }
}

/// Per-criterion contributions behind a score
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub skills: f64,
    pub position: f64,
    pub experience: f64,
    pub location: f64,
    pub employment: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.skills + self.position + self.experience + self.location + self.employment
    }
}

/// A candidate annotated with its relevance to one search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub candidate: CandidateProfile,
    pub score: f64,
    /// `None` when scoring this candidate faulted
    pub breakdown: Option<ScoreBreakdown>,
}

impl ScoredCandidate {
    pub(crate) fn new(candidate: CandidateProfile, score: f64, breakdown: Option<ScoreBreakdown>) -> Self {
        Self {
            candidate,
            score,
            breakdown,
        }
    }

    pub fn is_scored(&self) -> bool {
        self.breakdown.is_some()
    }
}
