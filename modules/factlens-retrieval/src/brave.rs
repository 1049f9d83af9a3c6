use anyhow::{anyhow, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::Deserialize;
use tracing::debug;

use factlens_common::SourceEvidence;

const BRAVE_API_URL: &str = "https://api.search.brave.com/res/v1/web/search";

/// Brave Search web retriever. One HTTP GET per query; results are
/// mapped straight into `SourceEvidence` for the researcher.
pub struct BraveSearch {
    api_key: String,
    http: reqwest::Client,
    base_url: String,
}

impl BraveSearch {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            http: reqwest::Client::new(),
            base_url: BRAVE_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            "X-Subscription-Token",
            HeaderValue::from_str(&self.api_key)?,
        );
        Ok(headers)
    }

    /// Run one web search. `count` is clamped to the API's 1..=20 range.
    pub async fn search(&self, query: &str, count: usize) -> Result<Vec<SourceEvidence>> {
        let count = count.clamp(1, 20);
        debug!(query, count, "Brave web search");

        let response = self
            .http
            .get(&self.base_url)
            .headers(self.headers()?)
            .query(&[
                ("q", query),
                ("count", &count.to_string()),
                ("country", "us"),
                ("search_lang", "en"),
                ("extra_snippets", "true"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(anyhow!("Brave API error ({}): {}", status, error_text));
        }

        let payload: BraveResponse = response.json().await?;
        Ok(to_sources(payload))
    }
}

fn to_sources(payload: BraveResponse) -> Vec<SourceEvidence> {
    payload
        .web
        .map(|web| web.results)
        .unwrap_or_default()
        .into_iter()
        .map(|item| SourceEvidence {
            title: item.title,
            url: item.url,
            snippet: item.description,
            publisher: None,
            published_at: item.age,
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct BraveResponse {
    web: Option<BraveWeb>,
}

#[derive(Debug, Deserialize)]
struct BraveWeb {
    #[serde(default)]
    results: Vec<BraveResult>,
}

#[derive(Debug, Deserialize)]
struct BraveResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    description: String,
    age: Option<String>,
}
