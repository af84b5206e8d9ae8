//! Component wiring for Paddock.
//!
//! Builds the embedder, index provider, content cache, retriever, and RAG
//! engine from settings, and exposes the question-answering flow used by
//! the CLI and the web UI.

use crate::config::Settings;
use crate::content::{ContentCache, ContentStore, S3ContentStore};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::Result;
use crate::index::{
    ensure_indexes, Match, PineconeIndexProvider, ProvisionReport, VectorIndexProvider,
};
use crate::rag::RagEngine;
use crate::retrieval::{combine_context, Retriever};
use std::sync::Arc;
use tracing::{info, instrument};

/// Result of one question-answering pass.
#[derive(Debug, Clone)]
pub struct AskOutcome {
    /// The generated answer.
    pub answer: String,
    /// The assembled context handed to the model.
    pub context: String,
    /// The ranked matches behind the context.
    pub matches: Vec<Match>,
}

/// The main orchestrator for Paddock.
pub struct Orchestrator {
    settings: Settings,
    indexes: Arc<dyn VectorIndexProvider>,
    content: Arc<ContentCache>,
    retriever: Retriever,
    rag: RagEngine,
}

impl Orchestrator {
    /// Create a new orchestrator with default components.
    ///
    /// Reads OpenAI, Pinecone, and AWS credentials from the environment.
    pub async fn new(settings: Settings) -> Result<Self> {
        let embedder: Arc<dyn Embedder> = Arc::new(OpenAIEmbedder::with_config(
            &settings.embedding.model,
            settings.embedding.dimensions as usize,
        ));

        let indexes: Arc<dyn VectorIndexProvider> =
            Arc::new(PineconeIndexProvider::from_env(&settings.index)?);

        let store: Arc<dyn ContentStore> =
            Arc::new(S3ContentStore::new(settings.content.clone()).await);

        Ok(Self::with_components(settings, embedder, indexes, store))
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        embedder: Arc<dyn Embedder>,
        indexes: Arc<dyn VectorIndexProvider>,
        store: Arc<dyn ContentStore>,
    ) -> Self {
        let retriever = Retriever::new(
            embedder,
            indexes.clone(),
            settings.index.names.clone(),
            settings.retrieval.clone(),
        );

        let rag = RagEngine::new(settings.rag.clone());

        Self {
            settings,
            indexes,
            content: Arc::new(ContentCache::new(store)),
            retriever,
            rag,
        }
    }

    /// Create any missing regulation indexes.
    ///
    /// Invoked explicitly by the process entry point before the first
    /// query, never as an import-time side effect.
    pub async fn provision(&self) -> Result<ProvisionReport> {
        let report = ensure_indexes(self.indexes.as_ref(), &self.settings.index).await?;
        if !report.created.is_empty() {
            info!("Provisioned {} new index(es)", report.created.len());
        }
        Ok(report)
    }

    /// Answer a question using the configured keyword list.
    pub async fn ask(&self, question: &str) -> Result<AskOutcome> {
        let keywords = self.retriever.default_keywords().to_vec();
        self.ask_with_keywords(question, &keywords).await
    }

    /// Answer a question, prioritizing matches containing the keywords.
    #[instrument(skip(self), fields(question = %question))]
    pub async fn ask_with_keywords(
        &self,
        question: &str,
        keywords: &[String],
    ) -> Result<AskOutcome> {
        let matches = self.retriever.retrieve(question, keywords).await;
        let context = combine_context(&matches, self.retriever.max_context_blocks());
        let answer = self.rag.answer(&context, question).await?;

        Ok(AskOutcome {
            answer,
            context,
            matches,
        })
    }

    /// Retrieve matches without generating an answer.
    pub async fn search(&self, query: &str, keywords: &[String]) -> Vec<Match> {
        self.retriever.retrieve(query, keywords).await
    }

    /// The memoizing content cache.
    pub fn content(&self) -> Arc<ContentCache> {
        self.content.clone()
    }

    /// The active settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
