use std::sync::Arc;
use talent_scout::app::ports::{HttpClientPort, HttpGetResult};
use talent_scout::constants::get_supported_sites;
use talent_scout::sites::create_adapter;
use talent_scout::{ExperienceLevel, Result, SearchSpecification};

struct Offline;

#[async_trait::async_trait]
impl HttpClientPort for Offline {
    async fn get(&self, url: &str) -> Result<HttpGetResult> {
        Err(talent_scout::ScoutError::Status {
            url: url.to_string(),
            status: 599,
        })
    }
}

fn urls(spec: &SearchSpecification, page: u32) -> Vec<String> {
    let http: Arc<dyn HttpClientPort> = Arc::new(Offline);
    get_supported_sites()
        .into_iter()
        .filter_map(|site| create_adapter(site, http.clone()))
        .map(|adapter| adapter.build_query(spec, page))
        .collect()
}

#[test]
fn test_position_and_location_only() {
    let spec = SearchSpecification::new().with_position("python").with_location("kyiv");
    let urls = urls(&spec, 1);
    assert_eq!(
        urls,
        vec![
            "https://www.work.ua/resumes-kyiv-it-python/?page=1&period=5".to_string(),
            "https://robota.ua/candidates/python/kyiv?period=%22All%22&rubrics=%5B%221%22%5D".to_string(),
        ]
    );
}

#[test]
fn test_experience_filter_on_both_sites() {
    let spec = SearchSpecification::new()
        .with_position("rust")
        .with_experience_level(ExperienceLevel::FiveToTen)
        .with_experience_level(ExperienceLevel::MoreThanTen);
    let urls = urls(&spec, 1);
    assert!(urls[0].ends_with("&experience=166%2B166"));
    assert!(urls[1].ends_with("&experienceIds=%5B%224%22%2C%225%22%5D"));
}

#[test]
fn test_urls_are_pure() {
    let spec = SearchSpecification::new()
        .with_position("qa engineer")
        .with_salary_range(Some(1000), Some(2000));
    assert_eq!(urls(&spec, 3), urls(&spec, 3));
}
