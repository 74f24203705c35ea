mod common;

use common::{robota_ua_listing, work_ua_listing, work_ua_resume, FixtureHttp};
use std::sync::Arc;
use talent_scout::config::Config;
use talent_scout::{CandidateSearch, EmploymentType, SearchSpecification};

fn python_spec() -> SearchSpecification {
    SearchSpecification::new()
        .with_position("python")
        .with_location("kyiv")
        .with_keyword("python")
        .with_keyword("django")
}

fn populated_http() -> FixtureHttp {
    FixtureHttp::new()
        .route("www.work.ua/resumes-kyiv-it-python/", work_ua_listing(&["101", "102", "103"]))
        .route(
            "www.work.ua/resumes/101/",
            work_ua_resume("101", "Олег", "Java Developer", "Львів", &["Java"]),
        )
        .route(
            "www.work.ua/resumes/102/",
            work_ua_resume("102", "Марія", "Python Developer", "Kyiv", &["Python", "Django"]),
        )
        .route(
            "www.work.ua/resumes/103/",
            work_ua_resume("103", "Андрій", "Senior Python Engineer", "Kyiv region", &["py"]),
        )
        .route("robota.ua/candidates/python/kyiv", robota_ua_listing(&["9001", "9002"]))
}

#[tokio::test]
async fn test_search_ranks_best_match_first() {
    let http = Arc::new(populated_http());
    let search = CandidateSearch::from_config(&Config::default(), http.clone());

    let outcome = search.search(&python_spec()).await;

    let ids: Vec<&str> = outcome.ranked.iter().map(|s| s.candidate.id.as_str()).collect();
    assert_eq!(ids, vec!["102", "103", "101"]);
    // skills 17.5 + position 25 + location 10
    assert_eq!(outcome.ranked[0].score, 52.5);
    // py -> python: skills 8.75 + position 25 + partial location 5
    assert_eq!(outcome.ranked[1].score, 38.75);
    assert_eq!(outcome.ranked[2].score, 0.0);
    assert!(outcome.ranked.iter().all(|s| s.is_scored()));

    let top = &outcome.ranked[0].candidate;
    assert_eq!(top.employment_type, Some(EmploymentType::FullTime));
    assert_eq!(top.salary_expectation, Some(40000));
    assert_eq!(top.total_experience_years, 2.0);

    assert_eq!(outcome.page, 1);
    let work = &outcome.report.sites[0];
    assert_eq!((work.site, work.listed, work.acquired, work.dropped), ("work_ua", 3, 3, 0));
    let robota = &outcome.report.sites[1];
    assert_eq!((robota.site, robota.listed, robota.acquired, robota.dropped), ("robota_ua", 2, 0, 2));
    assert!(!outcome.report.all_sources_failed());

    // robota.ua profiles are never requested
    assert!(http.requests().iter().all(|url| !url.contains("robota.ua/candidates/900")));
}

#[tokio::test]
async fn test_ranking_ignores_employment_when_not_requested() {
    let search = CandidateSearch::from_config(&Config::default(), Arc::new(populated_http()));
    let outcome = search
        .search(&python_spec().with_employment_type(EmploymentType::Remote))
        .await;
    assert_eq!(outcome.ranked[0].score, 52.5);
    assert_eq!(outcome.ranked[0].breakdown.unwrap().employment, 0.0);
}

#[tokio::test]
async fn test_all_sources_failing() {
    let http = Arc::new(FixtureHttp::new().failing("work.ua", 503).failing("robota.ua", 500));
    let search = CandidateSearch::from_config(&Config::default(), http);

    let outcome = search.search(&python_spec()).await;

    assert!(outcome.ranked.is_empty());
    assert!(outcome.report.all_sources_failed());
    assert!(outcome.report.sites.iter().all(|s| s.listing_failed));
}

#[tokio::test]
async fn test_partial_failures_absorbed() {
    let http = FixtureHttp::new()
        .failing("www.work.ua/resumes/102/", 500)
        .route("www.work.ua/resumes-kyiv-it-python/", work_ua_listing(&["101", "102", "104"]))
        .route(
            "www.work.ua/resumes/101/",
            work_ua_resume("101", "Олег", "Python Developer", "Kyiv", &["Python"]),
        )
        // no name heading
        .route(
            "www.work.ua/resumes/104/",
            r#"<div id="resume_104"><h2 class="mt-lg">QA</h2></div>"#,
        )
        .failing("robota.ua", 503);
    let search = CandidateSearch::from_config(&Config::default(), Arc::new(http));

    let outcome = search.search(&python_spec()).await;

    let ids: Vec<&str> = outcome.ranked.iter().map(|s| s.candidate.id.as_str()).collect();
    assert_eq!(ids, vec!["101"]);
    let work = &outcome.report.sites[0];
    assert_eq!((work.listed, work.acquired, work.dropped), (3, 1, 2));
    assert!(outcome.report.sites[1].listing_failed);
    assert!(!outcome.report.all_sources_failed());
}

#[tokio::test]
async fn test_next_page_advances_every_site() {
    let http = Arc::new(populated_http());
    let mut search = CandidateSearch::from_config(&Config::default(), http.clone());

    search.search(&python_spec()).await;
    assert_eq!(search.next_page(), 2);
    let outcome = search.search(&python_spec()).await;
    assert_eq!(outcome.page, 2);

    let requests = http.requests();
    let listings: Vec<&String> = requests
        .iter()
        .filter(|url| url.contains("resumes-") || url.contains("robota.ua/candidates/python"))
        .collect();
    assert_eq!(listings.len(), 4);
    assert!(listings.iter().any(|url| url.contains("resumes-kyiv-it-python/?page=1&")));
    assert!(listings.iter().any(|url| url.contains("resumes-kyiv-it-python/?page=2&")));
    assert_eq!(listings.iter().filter(|url| url.contains("&page=2")).count(), 1);
    assert!(listings
        .iter()
        .filter(|url| url.contains("robota.ua"))
        .any(|url| !url.contains("page=")));

    search.reset_page();
    assert_eq!(search.current_page(), 1);
}

#[tokio::test]
async fn test_configured_site_order() {
    let mut config = Config::default();
    config.acquisition.sites = vec!["robota_ua".to_string(), "work_ua".to_string()];
    let search = CandidateSearch::from_config(&config, Arc::new(populated_http()));

    let outcome = search.search(&python_spec()).await;

    let sites: Vec<&str> = outcome.report.sites.iter().map(|s| s.site).collect();
    assert_eq!(sites, vec!["robota_ua", "work_ua"]);
    assert_eq!(outcome.ranked.len(), 3);
}

#[tokio::test]
async fn test_custom_synonyms_from_config() {
    let config = Config::from_toml(
        r#"
[acquisition]
sites = ["work_ua"]

[skills.synonyms]
django = ["django rest framework"]
"#,
    )
    .unwrap();
    let http = FixtureHttp::new()
        .route("www.work.ua/resumes-kyiv-it-python/", work_ua_listing(&["7"]))
        .route(
            "www.work.ua/resumes/7/",
            work_ua_resume("7", "Ірина", "Backend Engineer", "Odesa", &["Django REST Framework"]),
        );
    let search = CandidateSearch::from_config(&config, Arc::new(http));

    let outcome = search.search(&python_spec()).await;

    assert_eq!(outcome.report.sites.len(), 1);
    // one direct match out of two keywords
    assert_eq!(outcome.ranked[0].breakdown.unwrap().skills, 8.75);
}
