//! Work-history parsing shared by the site adapters.
//!
//! Adapters pull `(title, period, company, description)` tuples out of their
//! own markup; this module turns those strings into dated [`WorkExperience`]
//! entries and the aggregate tenure in months.

use crate::metrics;
use crate::types::WorkExperience;
use chrono::{Datelike, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// One work-history item as found in the markup, before any parsing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawExperienceEntry {
    pub title: String,
    pub period: String,
    pub company: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    pub entries: Vec<WorkExperience>,
    pub total_months: u32,
}

impl Timeline {
    /// Tenure in years, unrounded
    pub fn total_years(&self) -> f64 {
        self.total_months as f64 / 12.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Period {
    start: NaiveDate,
    end: NaiveDate,
    is_current: bool,
}

// "з 03.2019 по 05.2021", "from 03.2019 to present", "03.2019 – нині"
static PERIOD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:(?:з|from)\s+)?(\d{1,2})\.(\d{4})\s*(?:по|to|till|until|–|—|-)\s*(?:(\d{1,2})\.(\d{4})|(нині|теперішній час|present|now|current))",
    )
    .expect("period regex")
});

// "Company, City (Industry)"
static COMPANY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?)(?:, (.*?))?(?: \((.*?)\))?$").expect("company regex"));

/// Turns raw work-history entries into dated experience for one site
#[derive(Debug, Clone, Copy)]
pub struct ExperienceTimelineParser {
    site: &'static str,
}

impl ExperienceTimelineParser {
    /// `site` labels the value-fault counter for unparsable periods
    pub fn new(site: &'static str) -> Self {
        Self { site }
    }

    /// Parses against the current local month
    pub fn parse(&self, entries: &[RawExperienceEntry]) -> Timeline {
        self.parse_at(entries, Local::now().date_naive())
    }

    /// Parses with `today` standing in for "present"
    pub fn parse_at(&self, entries: &[RawExperienceEntry], today: NaiveDate) -> Timeline {
        let current_month = first_of_month(today);
        let mut timeline = Timeline::default();

        for entry in entries {
            let Some(period) = parse_period(&entry.period, current_month) else {
                debug!("Skipping experience '{}': unrecognized period '{}'", entry.title, entry.period);
                metrics::record_value_fault(self.site, "experience_period");
                continue;
            };
            let Some(company_text) = entry.company.as_deref().map(str::trim).filter(|c| !c.is_empty()) else {
                debug!("Skipping experience '{}': no company line", entry.title);
                continue;
            };
            let (company, city, industry) = split_company(company_text);
            let duration_months = months_between(period.start, period.end);

            timeline.total_months += duration_months;
            timeline.entries.push(WorkExperience {
                position: entry.title.trim().to_string(),
                company,
                duration_months,
                start_date: period.start,
                end_date: if period.is_current { None } else { Some(period.end) },
                is_current: period.is_current,
                description: entry
                    .description
                    .as_deref()
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .map(String::from),
                industry,
                city,
            });
        }

        timeline
    }
}

fn parse_period(text: &str, current_month: NaiveDate) -> Option<Period> {
    let caps = PERIOD_RE.captures(text)?;
    let start = month_year(caps.get(1)?.as_str(), caps.get(2)?.as_str())?;

    if caps.get(5).is_some() {
        return Some(Period {
            start,
            end: current_month,
            is_current: true,
        });
    }

    let end = month_year(caps.get(3)?.as_str(), caps.get(4)?.as_str())?;
    Some(Period {
        start,
        end,
        is_current: false,
    })
}

fn month_year(month: &str, year: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Whole months from `start` to `end`, floored at zero
pub fn months_between(start: NaiveDate, end: NaiveDate) -> u32 {
    let months = (end.year() - start.year()) * 12 + (end.month() as i32 - start.month() as i32);
    months.max(0) as u32
}

fn split_company(text: &str) -> (String, Option<String>, Option<String>) {
    let optional = |m: Option<regex::Match<'_>>| {
        m.map(|m| m.as_str().trim().to_string()).filter(|s| !s.is_empty())
    };
    match COMPANY_RE.captures(text) {
        Some(caps) => (
            caps.get(1).map(|m| m.as_str().trim().to_string()).unwrap_or_default(),
            optional(caps.get(2)),
            optional(caps.get(3)),
        ),
        None => (text.to_string(), None, None),
    }
}
