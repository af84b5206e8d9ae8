//! Vector index client and provisioning.
//!
//! Provides a trait-based interface over the hosted vector-search service,
//! plus idempotent create-if-absent provisioning for the regulation indexes.

mod memory;
mod pinecone;

pub use memory::MemoryIndexProvider;
pub use pinecone::PineconeIndexProvider;

use crate::config::IndexSettings;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

/// A scored match returned from an index query.
///
/// Produced transiently per query; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    /// Snippet text from the match metadata.
    pub text: String,
    /// Similarity score (higher is better).
    pub score: f32,
    /// Name of the index that produced this match.
    pub source_index: String,
}

/// Trait for vector index service implementations.
#[async_trait]
pub trait VectorIndexProvider: Send + Sync {
    /// List the names of all existing indexes.
    async fn list_indexes(&self) -> Result<Vec<String>>;

    /// Create an index with the given dimension and similarity metric.
    async fn create_index(&self, name: &str, dimension: u32, metric: &str) -> Result<()>;

    /// Query an index for the top-k nearest neighbors of an embedding.
    async fn query(&self, index: &str, embedding: &[f32], top_k: usize) -> Result<Vec<Match>>;
}

/// Outcome of a provisioning pass.
#[derive(Debug, Clone, Default)]
pub struct ProvisionReport {
    /// Indexes created by this pass.
    pub created: Vec<String>,
    /// Indexes that already existed.
    pub existing: Vec<String>,
}

/// Create any missing indexes from the configured set.
///
/// Idempotent: indexes that already exist are left untouched, so running
/// this on every startup is safe.
pub async fn ensure_indexes(
    provider: &dyn VectorIndexProvider,
    settings: &IndexSettings,
) -> Result<ProvisionReport> {
    let existing = provider.list_indexes().await?;
    let mut report = ProvisionReport::default();

    for name in &settings.names {
        if existing.iter().any(|e| e == name) {
            info!("Index {} already exists", name);
            report.existing.push(name.clone());
        } else {
            provider
                .create_index(name, settings.dimension, &settings.metric)
                .await?;
            info!("Created index {}", name);
            report.created.push(name.clone());
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_index_settings() -> IndexSettings {
        IndexSettings {
            names: vec!["sporting".to_string(), "technical".to_string()],
            ..IndexSettings::default()
        }
    }

    #[tokio::test]
    async fn test_provisioning_creates_missing() {
        let provider = MemoryIndexProvider::new();
        let report = ensure_indexes(&provider, &two_index_settings()).await.unwrap();

        assert_eq!(report.created, vec!["sporting", "technical"]);
        assert!(report.existing.is_empty());
        assert_eq!(provider.create_calls(), 2);
    }

    #[tokio::test]
    async fn test_provisioning_is_idempotent() {
        let settings = IndexSettings {
            names: vec!["sporting".to_string()],
            ..IndexSettings::default()
        };
        let provider = MemoryIndexProvider::new();

        let first = ensure_indexes(&provider, &settings).await.unwrap();
        assert_eq!(first.created.len(), 1);

        let second = ensure_indexes(&provider, &settings).await.unwrap();
        assert!(second.created.is_empty());
        assert_eq!(second.existing, vec!["sporting"]);

        // Exactly one create across both passes.
        assert_eq!(provider.create_calls(), 1);
    }
}
