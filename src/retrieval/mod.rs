//! Hybrid retrieval across the regulation indexes.
//!
//! A query is embedded once, every configured index is searched, keyword
//! hits are promoted ahead of pure vector hits within each index, and the
//! combined output is ranked by score.

use crate::config::RetrievalSettings;
use crate::embedding::Embedder;
use crate::error::Result;
use crate::index::{Match, VectorIndexProvider};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Hybrid retriever over a set of named indexes.
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    provider: Arc<dyn VectorIndexProvider>,
    index_names: Vec<String>,
    settings: RetrievalSettings,
}

impl Retriever {
    /// Create a retriever over the given indexes.
    pub fn new(
        embedder: Arc<dyn Embedder>,
        provider: Arc<dyn VectorIndexProvider>,
        index_names: Vec<String>,
        settings: RetrievalSettings,
    ) -> Self {
        Self {
            embedder,
            provider,
            index_names,
            settings,
        }
    }

    /// Fetch the most relevant matches for a query.
    ///
    /// Never fails: an embedding failure yields an empty result set, and a
    /// failed index query yields an empty list for that index. Both are
    /// logged.
    #[instrument(skip(self), fields(query = %query))]
    pub async fn retrieve(&self, query: &str, keywords: &[String]) -> Vec<Match> {
        let embedding = match self.embedder.embed(query).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!("Failed to generate query embedding: {}", e);
                return Vec::new();
            }
        };

        let mut all = Vec::new();
        for name in &self.index_names {
            let matches = match self
                .provider
                .query(name, &embedding, self.settings.per_index_top_k)
                .await
            {
                Ok(matches) => matches,
                Err(e) => {
                    warn!("Query against index {} failed: {}", name, e);
                    Vec::new()
                }
            };

            debug!("Index {} returned {} matches", name, matches.len());
            all.extend(keyword_first(
                matches,
                keywords,
                self.settings.per_index_limit,
            ));
        }

        rank_by_score(all, self.settings.final_limit)
    }

    /// The keyword list applied when the caller supplies none.
    pub fn default_keywords(&self) -> &[String] {
        &self.settings.keywords
    }

    /// Maximum unique text blocks assembled into a context.
    pub fn max_context_blocks(&self) -> usize {
        self.settings.max_context_blocks
    }
}

/// Reorder one index's matches so keyword hits come first.
///
/// Both groups keep their original order, and the result is truncated to
/// `limit`.
fn keyword_first(matches: Vec<Match>, keywords: &[String], limit: usize) -> Vec<Match> {
    let lowered: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

    let (mut hits, rest): (Vec<Match>, Vec<Match>) = matches.into_iter().partition(|m| {
        let text = m.text.to_lowercase();
        lowered.iter().any(|k| text.contains(k))
    });

    hits.extend(rest);
    hits.truncate(limit);
    hits
}

/// Rank matches by descending score, keeping insertion order on ties.
fn rank_by_score(mut matches: Vec<Match>, limit: usize) -> Vec<Match> {
    matches.sort_by(|a, b| b.score.total_cmp(&a.score));
    matches.truncate(limit);
    matches
}

/// Combine match texts into a single context string.
///
/// Duplicate texts are dropped, order is preserved, and at most
/// `max_blocks` blocks are joined with blank lines.
pub fn combine_context(matches: &[Match], max_blocks: usize) -> String {
    let mut seen = HashSet::new();
    let blocks: Vec<&str> = matches
        .iter()
        .map(|m| m.text.as_str())
        .filter(|text| !text.is_empty() && seen.insert(*text))
        .take(max_blocks)
        .collect();

    blocks.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PaddockError;
    use crate::index::MemoryIndexProvider;
    use async_trait::async_trait;

    struct FixedEmbedder;

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0, 0.0, 0.0])
        }

        fn dimensions(&self) -> usize {
            3
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(PaddockError::Embedding("API unavailable".to_string()))
        }

        fn dimensions(&self) -> usize {
            3
        }
    }

    fn m(index: &str, text: &str, score: f32) -> Match {
        Match {
            text: text.to_string(),
            score,
            source_index: index.to_string(),
        }
    }

    fn retriever(provider: MemoryIndexProvider, names: &[&str]) -> Retriever {
        Retriever::new(
            Arc::new(FixedEmbedder),
            Arc::new(provider),
            names.iter().map(|n| n.to_string()).collect(),
            RetrievalSettings::default(),
        )
    }

    #[tokio::test]
    async fn test_embedding_failure_returns_empty() {
        let provider = MemoryIndexProvider::new()
            .with_matches("sporting", vec![m("sporting", "Article 4.1", 0.9)]);
        let retriever = Retriever::new(
            Arc::new(FailingEmbedder),
            Arc::new(provider),
            vec!["sporting".to_string()],
            RetrievalSettings::default(),
        );

        let matches = retriever.retrieve("minimum weight", &[]).await;
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn test_failed_index_yields_empty_for_that_index() {
        // "technical" is not registered, so its query errors.
        let provider = MemoryIndexProvider::new()
            .with_matches("sporting", vec![m("sporting", "Article 4.1", 0.9)]);
        let retriever = retriever(provider, &["sporting", "technical"]);

        let matches = retriever.retrieve("minimum weight", &[]).await;
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].source_index, "sporting");
    }

    #[tokio::test]
    async fn test_highest_scores_win_across_indexes() {
        // Three indexes, four distinct-score matches each. The five
        // highest of the twelve must come back, best first.
        let provider = MemoryIndexProvider::new()
            .with_matches(
                "sporting",
                vec![
                    m("sporting", "s1", 0.95),
                    m("sporting", "s2", 0.60),
                    m("sporting", "s3", 0.40),
                    m("sporting", "s4", 0.10),
                ],
            )
            .with_matches(
                "technical",
                vec![
                    m("technical", "t1", 0.90),
                    m("technical", "t2", 0.85),
                    m("technical", "t3", 0.30),
                    m("technical", "t4", 0.20),
                ],
            )
            .with_matches(
                "financial",
                vec![
                    m("financial", "f1", 0.80),
                    m("financial", "f2", 0.70),
                    m("financial", "f3", 0.50),
                    m("financial", "f4", 0.05),
                ],
            );
        let retriever = retriever(provider, &["sporting", "technical", "financial"]);

        let matches = retriever
            .retrieve("What are the minimum weight regulations?", &[])
            .await;

        let texts: Vec<&str> = matches.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["s1", "t1", "t2", "f1", "f2"]);
    }

    #[tokio::test]
    async fn test_final_count_never_exceeds_limit() {
        let many: Vec<Match> = (0..10)
            .map(|i| m("sporting", &format!("s{}", i), 0.9 - i as f32 * 0.01))
            .collect();
        let provider = MemoryIndexProvider::new()
            .with_matches("sporting", many.clone())
            .with_matches("technical", many.clone())
            .with_matches("financial", many);
        let retriever = retriever(provider, &["sporting", "technical", "financial"]);

        let matches = retriever.retrieve("anything", &[]).await;
        assert!(matches.len() <= 5);
    }

    #[tokio::test]
    async fn test_score_ties_keep_insertion_order() {
        let provider = MemoryIndexProvider::new()
            .with_matches(
                "sporting",
                vec![m("sporting", "first", 0.5), m("sporting", "second", 0.5)],
            )
            .with_matches("technical", vec![m("technical", "third", 0.5)]);
        let retriever = retriever(provider, &["sporting", "technical"]);

        let matches = retriever.retrieve("anything", &[]).await;
        let texts: Vec<&str> = matches.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_keyword_matches_come_first() {
        let matches = vec![
            m("sporting", "fuel flow limits", 0.9),
            m("sporting", "minimum weight is 798kg", 0.8),
            m("sporting", "parc ferme rules", 0.7),
            m("sporting", "weight distribution", 0.6),
        ];

        let merged = keyword_first(matches, &["Weight".to_string()], 5);
        let texts: Vec<&str> = merged.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "minimum weight is 798kg",
                "weight distribution",
                "fuel flow limits",
                "parc ferme rules",
            ]
        );
    }

    #[test]
    fn test_empty_keyword_list_preserves_order() {
        let matches = vec![
            m("sporting", "a", 0.9),
            m("sporting", "b", 0.8),
            m("sporting", "c", 0.7),
        ];

        let merged = keyword_first(matches, &[], 5);
        let texts: Vec<&str> = merged.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_keyword_merge_truncates() {
        let matches: Vec<Match> = (0..8)
            .map(|i| m("sporting", &format!("t{}", i), 0.9))
            .collect();
        assert_eq!(keyword_first(matches, &[], 5).len(), 5);
    }

    #[test]
    fn test_combine_context_dedupes_and_caps() {
        let matches = vec![
            m("sporting", "block one", 0.9),
            m("technical", "block one", 0.85),
            m("sporting", "", 0.8),
            m("financial", "block two", 0.7),
            m("technical", "block three", 0.6),
            m("financial", "block four", 0.5),
        ];

        let context = combine_context(&matches, 3);
        assert_eq!(context, "block one\n\nblock two\n\nblock three");
    }

    #[test]
    fn test_combine_context_empty_matches() {
        assert_eq!(combine_context(&[], 3), "");
    }
}
