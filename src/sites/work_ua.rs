//! work.ua: filters as plain query parameters, position and location folded
//! into the `/resumes-<location>-it-<position>/` path.

use super::{fetch_html, last_path_segment, path_slug, CandidateRef, SiteAdapter};
use crate::app::ports::HttpClientPort;
use crate::constants::{WORK_UA_BASE_URL, WORK_UA_SITE};
use crate::error::{Result, ScoutError};
use crate::metrics::{self, FetchStage};
use crate::parser::html::{
    clean_text, first_own_text, has_class, next_element_siblings, next_in_document, selector, text_after_br,
};
use crate::parser::{ExperienceTimelineParser, RawExperienceEntry};
use crate::types::{CandidateProfile, EmploymentType, ExperienceLevel, SearchSpecification};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Resumes posted within the last year
const PERIOD_FILTER: &str = "5";

const LOCATION_LABEL: &str = "Місто проживання";
const EMPLOYMENT_LABEL: &str = "Зайнятість";
const EXPERIENCE_HEADING: &str = "Досвід роботи";
const SKILLS_HEADING: &str = "Знання і навички";

static RESUME_LIST: Lazy<Selector> = Lazy::new(|| selector("div#pjax-resume-list"));
static RESUME_CARD: Lazy<Selector> = Lazy::new(|| selector("div.card-hover"));
static LINK: Lazy<Selector> = Lazy::new(|| selector("a[href]"));
static DIV_WITH_ID: Lazy<Selector> = Lazy::new(|| selector("div[id]"));
static NAME: Lazy<Selector> = Lazy::new(|| selector("h1.mt-0"));
static POSITION: Lazy<Selector> = Lazy::new(|| selector("h2.mt-lg"));
static INFO_LIST: Lazy<Selector> = Lazy::new(|| selector("dl.dl-horizontal"));
static DT: Lazy<Selector> = Lazy::new(|| selector("dt"));
static DD: Lazy<Selector> = Lazy::new(|| selector("dd"));
static H2: Lazy<Selector> = Lazy::new(|| selector("h2"));
static EXPERIENCE_ITEM: Lazy<Selector> = Lazy::new(|| selector("h2.h4.strong-600"));
static SKILL: Lazy<Selector> = Lazy::new(|| selector("span.ellipsis"));

static SALARY_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d[\d\s\u{a0}\u{202f}]*").expect("salary regex"));

pub fn experience_id(level: ExperienceLevel) -> &'static str {
    match level {
        ExperienceLevel::NoExperience => "0",
        ExperienceLevel::LessThan1 => "1",
        ExperienceLevel::OneToTwo => "164",
        ExperienceLevel::TwoToFive => "165",
        // work.ua has a single 5+ years bucket
        ExperienceLevel::FiveToTen => "166",
        ExperienceLevel::MoreThanTen => "166",
    }
}

pub fn employment_id(employment: EmploymentType) -> &'static str {
    match employment {
        EmploymentType::FullTime => "74",
        EmploymentType::PartTime => "75",
        EmploymentType::Remote => "76",
    }
}

pub struct WorkUaAdapter {
    http: Arc<dyn HttpClientPort>,
    timeline: ExperienceTimelineParser,
}

impl WorkUaAdapter {
    pub fn new(http: Arc<dyn HttpClientPort>) -> Self {
        Self {
            http,
            timeline: ExperienceTimelineParser::new(WORK_UA_SITE),
        }
    }

    pub fn profile_url(id: &str) -> String {
        format!("{}/resumes/{}/", WORK_UA_BASE_URL, id)
    }

    /// Resume ids from a search results page, in page order
    pub fn parse_listing(html: &str) -> Vec<CandidateRef> {
        let document = Html::parse_document(html);
        let Some(list) = document.select(&RESUME_LIST).next() else {
            debug!("No resume list container on work.ua results page");
            return Vec::new();
        };

        let mut seen = HashSet::new();
        list.select(&RESUME_CARD)
            .filter_map(|card| {
                card.select(&LINK)
                    .filter_map(|a| a.value().attr("href"))
                    .find(|href| href.contains("/resumes/"))
                    .and_then(last_path_segment)
                    .map(String::from)
            })
            .filter(|id| seen.insert(id.clone()))
            .map(|id| CandidateRef {
                site: WORK_UA_SITE,
                url: Self::profile_url(&id),
                id,
            })
            .collect()
    }

    pub fn parse_profile(&self, candidate: &CandidateRef, html: &str) -> Result<CandidateProfile> {
        self.parse_profile_at(candidate, html, Local::now().date_naive())
    }

    /// Parses a resume page; `today` resolves ongoing roles
    pub fn parse_profile_at(&self, candidate: &CandidateRef, html: &str, today: NaiveDate) -> Result<CandidateProfile> {
        let document = Html::parse_document(html);
        let container_id = format!("resume_{}", candidate.id);
        let container = required(
            "container",
            document
                .select(&DIV_WITH_ID)
                .find(|div| div.value().id() == Some(container_id.as_str())),
        )?;

        let name = required("name", container.select(&NAME).next().map(clean_text).filter(|n| !n.is_empty()))?;
        let position_heading = required("position", container.select(&POSITION).next())?;
        let position = required("position", Some(clean_text(position_heading)).filter(|p| !p.is_empty()))?;

        let salary_expectation = next_in_document(container, position_heading, "p", Some("h5"))
            .and_then(|p| parse_salary(&clean_text(p)));

        let (location, employment_type) = parse_info_list(container);

        let timeline = self.timeline.parse_at(&experience_entries(container), today);
        let skills = parse_skills(container);

        Ok(CandidateProfile {
            id: candidate.id.clone(),
            site: WORK_UA_SITE.to_string(),
            name,
            position,
            salary_expectation,
            location,
            skills,
            employment_type,
            source_url: candidate.url.clone(),
            total_experience_years: timeline.total_years(),
            experience: timeline.entries,
        })
    }
}

#[async_trait]
impl SiteAdapter for WorkUaAdapter {
    fn site_name(&self) -> &'static str {
        WORK_UA_SITE
    }

    fn build_query(&self, spec: &SearchSpecification, page: u32) -> String {
        let location = spec
            .location_text()
            .and_then(|l| path_slug(l, "+"))
            .map(|l| format!("-{}", l))
            .unwrap_or_default();
        let position = spec.position_text().and_then(|p| path_slug(p, "+")).unwrap_or_default();

        let mut params = url::form_urlencoded::Serializer::new(String::new());
        params.append_pair("page", &page.max(1).to_string());
        params.append_pair("period", PERIOD_FILTER);
        if let Some(employment) = spec.employment_type {
            params.append_pair("employment", employment_id(employment));
        }
        if !spec.experience_levels.is_empty() {
            let ids: Vec<&str> = spec.experience_levels.iter().map(|l| experience_id(*l)).collect();
            params.append_pair("experience", &ids.join("+"));
        }
        if let Some(min) = spec.min_salary {
            params.append_pair("salaryfrom", &min.to_string());
        }
        if let Some(max) = spec.max_salary {
            params.append_pair("salaryto", &max.to_string());
        }

        format!(
            "{}/resumes{}-it-{}/?{}",
            WORK_UA_BASE_URL,
            location,
            position,
            params.finish()
        )
    }

    #[instrument(skip(self))]
    async fn try_fetch_listing(&self, url: &str) -> Option<Vec<CandidateRef>> {
        let body = fetch_html(self.http.as_ref(), WORK_UA_SITE, url, FetchStage::Listing).await?;
        let refs = Self::parse_listing(&body);
        info!("Found {} resumes on work.ua listing", refs.len());
        Some(refs)
    }

    async fn fetch_profile(&self, candidate: &CandidateRef) -> Option<CandidateProfile> {
        let body = fetch_html(self.http.as_ref(), WORK_UA_SITE, &candidate.url, FetchStage::Profile).await?;
        match self.parse_profile(candidate, &body) {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!(candidate_id = %candidate.id, "Error parsing work.ua resume: {}", e);
                None
            }
        }
    }
}

fn required<T>(field: &'static str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| {
        metrics::record_extraction_fault(WORK_UA_SITE, field);
        ScoutError::MissingField(field.to_string())
    })
}

/// Amount in a salary line such as "25 000 грн"
fn parse_salary(text: &str) -> Option<u32> {
    let digits: String = SALARY_DIGITS
        .find(text)?
        .as_str()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    match digits.parse() {
        Ok(amount) => Some(amount),
        Err(_) => {
            metrics::record_value_fault(WORK_UA_SITE, "salary");
            debug!("Unparsable salary '{}'", text);
            None
        }
    }
}

fn parse_info_list(container: ElementRef<'_>) -> (Option<String>, Option<EmploymentType>) {
    let mut location = None;
    let mut employment = None;
    let Some(list) = container.select(&INFO_LIST).next() else {
        return (location, employment);
    };

    for (dt, dd) in list.select(&DT).zip(list.select(&DD)) {
        let key = clean_text(dt);
        let key = key.trim_end_matches(':').trim();
        let value = clean_text(dd);
        if key == LOCATION_LABEL || key == "Місто" {
            location = Some(value).filter(|v| !v.is_empty());
        } else if key == EMPLOYMENT_LABEL {
            employment = employment_from_text(&value);
            if employment.is_none() {
                metrics::record_value_fault(WORK_UA_SITE, "employment_type");
                debug!("Unrecognized employment text '{}'", value);
            }
        }
    }
    (location, employment)
}

fn employment_from_text(text: &str) -> Option<EmploymentType> {
    let text = text.to_lowercase();
    // "неповна" contains "повна", so part-time is checked first
    if text.contains("неповна зайнятість") {
        Some(EmploymentType::PartTime)
    } else if text.contains("повна зайнятість") {
        Some(EmploymentType::FullTime)
    } else if ["віддалена", "дистанційно"].iter().any(|term| text.contains(term)) {
        Some(EmploymentType::Remote)
    } else {
        None
    }
}

fn experience_entries(container: ElementRef<'_>) -> Vec<RawExperienceEntry> {
    let Some(block) = container
        .select(&H2)
        .find(|h2| clean_text(*h2).contains(EXPERIENCE_HEADING))
        .and_then(|h2| h2.parent())
        .and_then(ElementRef::wrap)
    else {
        return Vec::new();
    };

    block
        .select(&EXPERIENCE_ITEM)
        .map(|item| {
            let following: Vec<ElementRef<'_>> = next_element_siblings(item)
                .take_while(|sibling| sibling.value().name() != "h2")
                .collect();
            let details = following
                .iter()
                .find(|el| el.value().name() == "p" && has_class(**el, "mb-0"));
            let description = following
                .iter()
                .find(|el| el.value().name() == "p" && has_class(**el, "text-default-7"));

            RawExperienceEntry {
                title: clean_text(item),
                period: details.and_then(|d| first_own_text(*d)).unwrap_or_default(),
                company: details.and_then(|d| text_after_br(*d)),
                description: description.map(|d| clean_text(*d)),
            }
        })
        .collect()
}

fn parse_skills(container: ElementRef<'_>) -> Vec<String> {
    let Some(heading) = container
        .select(&H2)
        .find(|h2| clean_text(*h2).starts_with(SKILLS_HEADING))
    else {
        return Vec::new();
    };
    next_in_document(container, heading, "ul", None)
        .map(|list| {
            list.select(&SKILL)
                .map(clean_text)
                .filter(|skill| !skill.is_empty())
                .collect()
        })
        .unwrap_or_default()
}
