//! robota.ua: position and location as path segments, every other filter as a
//! JSON-valued query parameter.

use super::{fetch_html, last_path_segment, path_slug, CandidateRef, SiteAdapter};
use crate::app::ports::HttpClientPort;
use crate::constants::{ROBOTA_UA_BASE_URL, ROBOTA_UA_SITE};
use crate::metrics::{self, FetchStage};
use crate::parser::html::selector;
use crate::types::{CandidateProfile, EmploymentType, ExperienceLevel, SearchSpecification};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument};

const DEFAULT_POSITION: &str = "all";
const DEFAULT_LOCATION: &str = "ukraine";
const SALARY_FROM_DEFAULT: u32 = 0;
const SALARY_TO_DEFAULT: u32 = 100_000;
/// IT rubric
const RUBRICS: &[&str] = &["1"];

static CANDIDATE_LINK: Lazy<Selector> =
    Lazy::new(|| selector(r#"alliance-employer-cvdb-cv-list-card a[href^="/candidates/"]"#));

pub fn experience_id(level: ExperienceLevel) -> String {
    level.ordinal().to_string()
}

pub fn schedule_id(employment: EmploymentType) -> &'static str {
    match employment {
        EmploymentType::FullTime => "1",
        EmploymentType::PartTime => "2",
        EmploymentType::Remote => "3",
    }
}

pub struct RobotaUaAdapter {
    http: Arc<dyn HttpClientPort>,
}

impl RobotaUaAdapter {
    pub fn new(http: Arc<dyn HttpClientPort>) -> Self {
        Self { http }
    }

    pub fn profile_url(id: &str) -> String {
        format!("{}/candidates/{}", ROBOTA_UA_BASE_URL, id)
    }

    pub fn parse_listing(html: &str) -> Vec<CandidateRef> {
        let document = Html::parse_document(html);
        let mut seen = HashSet::new();
        document
            .select(&CANDIDATE_LINK)
            .filter_map(|a| a.value().attr("href"))
            .filter_map(last_path_segment)
            .filter(|id| seen.insert(id.to_string()))
            .map(|id| CandidateRef {
                site: ROBOTA_UA_SITE,
                id: id.to_string(),
                url: Self::profile_url(id),
            })
            .collect()
    }
}

fn json_list<S: AsRef<str>>(ids: &[S]) -> String {
    let ids: Vec<&str> = ids.iter().map(AsRef::as_ref).collect();
    serde_json::Value::from(ids).to_string()
}

#[async_trait]
impl SiteAdapter for RobotaUaAdapter {
    fn site_name(&self) -> &'static str {
        ROBOTA_UA_SITE
    }

    fn build_query(&self, spec: &SearchSpecification, page: u32) -> String {
        let position = spec
            .position_text()
            .and_then(|p| path_slug(p, "-"))
            .unwrap_or_else(|| DEFAULT_POSITION.to_string());
        let location = spec
            .location_text()
            .and_then(|l| path_slug(l, "-"))
            .unwrap_or_else(|| DEFAULT_LOCATION.to_string());

        let mut params = url::form_urlencoded::Serializer::new(String::new());
        params.append_pair("period", &json!("All").to_string());
        if spec.min_salary.is_some() || spec.max_salary.is_some() {
            let salary = json!({
                "from": spec.min_salary.unwrap_or(SALARY_FROM_DEFAULT),
                "to": spec.max_salary.unwrap_or(SALARY_TO_DEFAULT),
            });
            params.append_pair("salary", &salary.to_string());
        }
        params.append_pair("rubrics", &json_list(RUBRICS));
        if let Some(employment) = spec.employment_type {
            params.append_pair("scheduleIds", &json_list(&[schedule_id(employment)]));
        }
        if !spec.experience_levels.is_empty() {
            let ids: Vec<String> = spec.experience_levels.iter().map(|l| experience_id(*l)).collect();
            params.append_pair("experienceIds", &json_list(ids.as_slice()));
        }
        if page > 1 {
            params.append_pair("page", &page.to_string());
        }

        format!(
            "{}/candidates/{}/{}?{}",
            ROBOTA_UA_BASE_URL,
            position,
            location,
            params.finish()
        )
    }

    #[instrument(skip(self))]
    async fn try_fetch_listing(&self, url: &str) -> Option<Vec<CandidateRef>> {
        let body = fetch_html(self.http.as_ref(), ROBOTA_UA_SITE, url, FetchStage::Listing).await?;
        let refs = Self::parse_listing(&body);
        info!("Found {} candidates on robota.ua listing", refs.len());
        Some(refs)
    }

    /// Candidate pages are rendered client-side and carry no stable markup to
    /// parse, so no request is made.
    async fn fetch_profile(&self, candidate: &CandidateRef) -> Option<CandidateProfile> {
        debug!(candidate_id = %candidate.id, "robota.ua profile parsing unavailable");
        metrics::record_extraction_fault(ROBOTA_UA_SITE, "profile");
        None
    }
}
