//! F1 news feed client.

use crate::config::NewsSettings;
use crate::error::{PaddockError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const API_BASE: &str = "https://newsapi.org";

/// A news article as shown on the news panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
    #[serde(rename = "urlToImage", default)]
    pub url_to_image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

/// Client for the hosted news API.
pub struct NewsClient {
    http: reqwest::Client,
    api_key: String,
    api_base: String,
    settings: NewsSettings,
}

impl NewsClient {
    /// Create a client using the `NEWSAPI_API_KEY` environment variable.
    ///
    /// Returns None when the key is absent; the news panel is optional.
    pub fn from_env(settings: NewsSettings) -> Option<Self> {
        let api_key = std::env::var("NEWSAPI_API_KEY").ok().filter(|k| !k.is_empty())?;
        Some(Self::with_config(&api_key, API_BASE, settings))
    }

    /// Create a client against an explicit endpoint.
    pub fn with_config(api_key: &str, api_base: &str, settings: NewsSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
            settings,
        }
    }

    /// Fetch recent F1 articles.
    ///
    /// Articles whose title does not mention the sport are dropped, and the
    /// result is truncated to the configured maximum.
    #[instrument(skip(self))]
    pub async fn fetch(&self) -> Result<Vec<Article>> {
        let response = self
            .http
            .get(format!("{}/v2/everything", self.api_base))
            .query(&[
                ("q", self.settings.query.as_str()),
                ("language", "en"),
                ("sortBy", "publishedAt"),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PaddockError::News(format!("{}: {}", status, body)));
        }

        let parsed: EverythingResponse = response.json().await?;
        debug!("News API returned {} articles", parsed.articles.len());

        let articles: Vec<Article> = parsed
            .articles
            .into_iter()
            .filter(|a| {
                let title = a.title.to_lowercase();
                title.contains("formula") || title.contains("f1")
            })
            .take(self.settings.max_articles)
            .collect();

        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn article(title: &str) -> serde_json::Value {
        serde_json::json!({
            "title": title,
            "description": null,
            "url": "https://example.com/a",
            "urlToImage": null
        })
    }

    #[tokio::test]
    async fn test_fetch_filters_and_truncates() {
        let server = MockServer::start_async().await;
        let mut articles: Vec<serde_json::Value> = (0..12)
            .map(|i| article(&format!("F1 race report {}", i)))
            .collect();
        articles.insert(0, article("Gardening tips for spring"));

        server
            .mock_async(move |when, then| {
                when.method(GET)
                    .path("/v2/everything")
                    .query_param("language", "en")
                    .query_param("sortBy", "publishedAt");
                then.status(200)
                    .json_body(serde_json::json!({ "articles": articles }));
            })
            .await;

        let client = NewsClient::with_config("key", &server.base_url(), NewsSettings::default());
        let fetched = client.fetch().await.unwrap();

        assert_eq!(fetched.len(), 9);
        assert!(fetched.iter().all(|a| a.title.to_lowercase().contains("f1")));
    }

    #[tokio::test]
    async fn test_fetch_error_status_is_typed() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v2/everything");
                then.status(401).body("bad key");
            })
            .await;

        let client = NewsClient::with_config("key", &server.base_url(), NewsSettings::default());
        let err = client.fetch().await.unwrap_err();
        assert!(matches!(err, PaddockError::News(_)));
    }
}
