use async_trait::async_trait;
use std::sync::Mutex;
use talent_scout::app::ports::{HttpClientPort, HttpGetResult};
use talent_scout::Result;

/// Serves canned bodies for URLs containing a registered fragment; 404 otherwise
#[derive(Default)]
pub struct FixtureHttp {
    routes: Vec<(String, u16, String)>,
    requests: Mutex<Vec<String>>,
}

impl FixtureHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, fragment: &str, body: impl Into<String>) -> Self {
        self.routes.push((fragment.to_string(), 200, body.into()));
        self
    }

    pub fn failing(mut self, fragment: &str, status: u16) -> Self {
        self.routes.push((fragment.to_string(), status, String::new()));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClientPort for FixtureHttp {
    async fn get(&self, url: &str) -> Result<HttpGetResult> {
        self.requests.lock().unwrap().push(url.to_string());
        let (status, body) = self
            .routes
            .iter()
            .find(|(fragment, _, _)| url.contains(fragment.as_str()))
            .map(|(_, status, body)| (*status, body.clone()))
            .unwrap_or((404, String::new()));
        Ok(HttpGetResult {
            status,
            body,
            content_type: "text/html; charset=utf-8".to_string(),
        })
    }
}

pub fn work_ua_listing(ids: &[&str]) -> String {
    let cards: String = ids
        .iter()
        .map(|id| {
            format!(
                r#"<div class="card card-hover card-search resume-link"><h2><a href="/resumes/{id}/">Resume {id}</a></h2></div>"#
            )
        })
        .collect();
    format!(r#"<html><body><div id="pjax-resume-list">{cards}</div></body></html>"#)
}

pub fn work_ua_resume(id: &str, name: &str, position: &str, location: &str, skills: &[&str]) -> String {
    let skills: String = skills
        .iter()
        .map(|skill| format!(r#"<li><span class="ellipsis">{skill}</span></li>"#))
        .collect();
    format!(
        r#"<html><body>
<div id="resume_{id}">
  <h1 class="mt-0">{name}</h1>
  <h2 class="mt-lg">{position}</h2>
  <p class="h5">40 000 грн</p>
  <dl class="dl-horizontal"><dt>Місто проживання:</dt><dd>{location}</dd><dt>Зайнятість:</dt><dd>Повна зайнятість</dd></dl>
  <div>
    <h2>Досвід роботи</h2>
    <h2 class="h4 strong-600">{position}</h2>
    <p class="mb-0">з 01.2020 по 01.2022<br>Acme, Київ</p>
  </div>
  <h2>Знання і навички</h2>
  <ul>{skills}</ul>
</div>
</body></html>"#
    )
}

pub fn robota_ua_listing(ids: &[&str]) -> String {
    let cards: String = ids
        .iter()
        .map(|id| {
            format!(r#"<alliance-employer-cvdb-cv-list-card><a href="/candidates/{id}">Candidate</a></alliance-employer-cvdb-cv-list-card>"#)
        })
        .collect();
    format!("<html><body>{cards}</body></html>")
}
