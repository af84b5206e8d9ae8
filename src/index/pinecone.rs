//! Pinecone REST implementation of the vector index provider.
//!
//! Index management goes through the control plane; queries go directly to
//! each index's configured data-plane host.

use super::{Match, VectorIndexProvider};
use crate::config::IndexSettings;
use crate::error::{PaddockError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use tracing::{debug, instrument};

const CONTROLLER_URL: &str = "https://api.pinecone.io";
const API_KEY_HEADER: &str = "Api-Key";

/// Pinecone-backed index provider.
pub struct PineconeIndexProvider {
    http: reqwest::Client,
    api_key: String,
    controller_url: String,
    environment: String,
    cloud: String,
    hosts: HashMap<String, String>,
}

impl PineconeIndexProvider {
    /// Create a provider using the `PINECONE_API_KEY` and `PINECONE_ENV`
    /// environment variables.
    pub fn from_env(settings: &IndexSettings) -> Result<Self> {
        let api_key = require_env("PINECONE_API_KEY")?;
        let environment = require_env("PINECONE_ENV")?;

        Ok(Self::with_config(
            &api_key,
            &environment,
            CONTROLLER_URL,
            &settings.cloud,
            settings.hosts.clone(),
        ))
    }

    /// Create a provider with explicit endpoints.
    pub fn with_config(
        api_key: &str,
        environment: &str,
        controller_url: &str,
        cloud: &str,
        hosts: HashMap<String, String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.to_string(),
            controller_url: controller_url.trim_end_matches('/').to_string(),
            environment: environment.to_string(),
            cloud: cloud.to_string(),
            hosts,
        }
    }

    fn host_for(&self, index: &str) -> Result<&str> {
        self.hosts
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| PaddockError::Config(format!("No host configured for index {}", index)))
    }
}

fn require_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(PaddockError::Config(format!("{} is not set", name))),
    }
}

#[derive(Debug, Deserialize)]
struct ListIndexesResponse {
    #[serde(default)]
    indexes: Vec<IndexDescription>,
}

#[derive(Debug, Deserialize)]
struct IndexDescription {
    name: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
struct QueryMatch {
    #[serde(default)]
    score: f32,
    metadata: Option<MatchMetadata>,
}

#[derive(Debug, Default, Deserialize)]
struct MatchMetadata {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl VectorIndexProvider for PineconeIndexProvider {
    #[instrument(skip(self))]
    async fn list_indexes(&self) -> Result<Vec<String>> {
        let response = self
            .http
            .get(format!("{}/indexes", self.controller_url))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PaddockError::Index(format!(
                "list indexes failed ({}): {}",
                status, body
            )));
        }

        let listing: ListIndexesResponse = response.json().await?;
        Ok(listing.indexes.into_iter().map(|i| i.name).collect())
    }

    #[instrument(skip(self))]
    async fn create_index(&self, name: &str, dimension: u32, metric: &str) -> Result<()> {
        let body = json!({
            "name": name,
            "dimension": dimension,
            "metric": metric,
            "spec": {
                "serverless": {
                    "cloud": self.cloud,
                    "region": self.environment,
                }
            }
        });

        let response = self
            .http
            .post(format!("{}/indexes", self.controller_url))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PaddockError::Index(format!(
                "create index {} failed ({}): {}",
                name, status, body
            )));
        }

        Ok(())
    }

    #[instrument(skip(self, embedding), fields(index = index, top_k = top_k))]
    async fn query(&self, index: &str, embedding: &[f32], top_k: usize) -> Result<Vec<Match>> {
        let host = self.host_for(index)?;

        let response = self
            .http
            .post(format!("{}/query", host.trim_end_matches('/')))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&json!({
                "vector": embedding,
                "topK": top_k,
                "includeMetadata": true,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PaddockError::Index(format!(
                "query {} failed ({}): {}",
                index, status, body
            )));
        }

        let parsed: QueryResponse = response.json().await?;
        debug!("Index {} returned {} matches", index, parsed.matches.len());

        Ok(parsed
            .matches
            .into_iter()
            .map(|m| Match {
                text: m.metadata.unwrap_or_default().text,
                score: m.score,
                source_index: index.to_string(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn provider_for(server: &MockServer) -> PineconeIndexProvider {
        let hosts = HashMap::from([("sporting".to_string(), server.base_url())]);
        PineconeIndexProvider::with_config("test-key", "us-east-1", &server.base_url(), "aws", hosts)
    }

    #[tokio::test]
    async fn test_list_indexes_parses_names() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/indexes").header("Api-Key", "test-key");
                then.status(200).json_body(serde_json::json!({
                    "indexes": [
                        {"name": "sporting-regulations-embeddings"},
                        {"name": "technical-regulations-embeddings"}
                    ]
                }));
            })
            .await;

        let provider = provider_for(&server);
        let names = provider.list_indexes().await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            names,
            vec![
                "sporting-regulations-embeddings",
                "technical-regulations-embeddings"
            ]
        );
    }

    #[tokio::test]
    async fn test_create_index_sends_spec() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/indexes")
                    .header("Api-Key", "test-key")
                    .json_body_includes(
                        r#"{"name": "sporting", "dimension": 1536, "metric": "cosine"}"#,
                    );
                then.status(201).json_body(serde_json::json!({"name": "sporting"}));
            })
            .await;

        let provider = provider_for(&server);
        provider.create_index("sporting", 1536, "cosine").await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_query_maps_matches() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/query");
                then.status(200).json_body(serde_json::json!({
                    "matches": [
                        {"id": "a", "score": 0.91, "metadata": {"text": "Article 4.1: minimum mass"}},
                        {"id": "b", "score": 0.72}
                    ]
                }));
            })
            .await;

        let provider = provider_for(&server);
        let matches = provider.query("sporting", &[0.1, 0.2], 10).await.unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].text, "Article 4.1: minimum mass");
        assert!((matches[0].score - 0.91).abs() < 1e-6);
        assert_eq!(matches[0].source_index, "sporting");
        // Missing metadata maps to empty text rather than an error.
        assert_eq!(matches[1].text, "");
    }

    #[tokio::test]
    async fn test_query_error_status_is_typed() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/query");
                then.status(500).body("backend exploded");
            })
            .await;

        let provider = provider_for(&server);
        let err = provider.query("sporting", &[0.1], 10).await.unwrap_err();
        assert!(matches!(err, PaddockError::Index(_)));
    }

    #[tokio::test]
    async fn test_query_unconfigured_host_is_config_error() {
        let provider = PineconeIndexProvider::with_config(
            "test-key",
            "us-east-1",
            CONTROLLER_URL,
            "aws",
            HashMap::new(),
        );
        let err = provider.query("sporting", &[0.1], 10).await.unwrap_err();
        assert!(matches!(err, PaddockError::Config(_)));
    }
}
