//! Error types for Paddock.

use thiserror::Error;

/// Library-level error type for Paddock operations.
#[derive(Error, Debug)]
pub enum PaddockError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Content store error: {0}")]
    Content(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Vector index error: {0}")]
    Index(String),

    #[error("RAG error: {0}")]
    Rag(String),

    #[error("News fetch failed: {0}")]
    News(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),
}

/// Result type alias for Paddock operations.
pub type Result<T> = std::result::Result<T, PaddockError>;
