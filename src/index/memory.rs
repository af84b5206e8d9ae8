//! In-memory index provider.
//!
//! Useful for testing the retrieval pipeline without a network.

use super::{Match, VectorIndexProvider};
use crate::error::{PaddockError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

/// In-memory index provider serving canned matches.
pub struct MemoryIndexProvider {
    indexes: RwLock<HashMap<String, Vec<Match>>>,
    create_calls: AtomicUsize,
}

impl MemoryIndexProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self {
            indexes: RwLock::new(HashMap::new()),
            create_calls: AtomicUsize::new(0),
        }
    }

    /// Register an index with the matches its queries should return.
    pub fn with_matches(self, name: &str, matches: Vec<Match>) -> Self {
        self.indexes
            .write()
            .unwrap()
            .insert(name.to_string(), matches);
        self
    }

    /// Number of create calls observed.
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }
}

impl Default for MemoryIndexProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorIndexProvider for MemoryIndexProvider {
    async fn list_indexes(&self) -> Result<Vec<String>> {
        let indexes = self.indexes.read().unwrap();
        Ok(indexes.keys().cloned().collect())
    }

    async fn create_index(&self, name: &str, _dimension: u32, _metric: &str) -> Result<()> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.indexes
            .write()
            .unwrap()
            .entry(name.to_string())
            .or_default();
        Ok(())
    }

    async fn query(&self, index: &str, _embedding: &[f32], top_k: usize) -> Result<Vec<Match>> {
        let indexes = self.indexes.read().unwrap();
        let matches = indexes
            .get(index)
            .ok_or_else(|| PaddockError::Index(format!("Unknown index: {}", index)))?;

        let mut result = matches.clone();
        result.truncate(top_k);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(text: &str, score: f32) -> Match {
        Match {
            text: text.to_string(),
            score,
            source_index: "sporting".to_string(),
        }
    }

    #[tokio::test]
    async fn test_query_truncates_to_top_k() {
        let provider = MemoryIndexProvider::new().with_matches(
            "sporting",
            vec![m("a", 0.9), m("b", 0.8), m("c", 0.7)],
        );

        let matches = provider.query("sporting", &[0.0], 2).await.unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].text, "a");
    }

    #[tokio::test]
    async fn test_query_unknown_index_errors() {
        let provider = MemoryIndexProvider::new();
        assert!(provider.query("missing", &[0.0], 5).await.is_err());
    }
}
