//! Configuration settings for Paddock.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub content: ContentSettings,
    pub embedding: EmbeddingSettings,
    pub index: IndexSettings,
    pub retrieval: RetrievalSettings,
    pub rag: RagSettings,
    pub news: NewsSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Object-store content settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentSettings {
    /// S3 bucket holding the encyclopedia content.
    pub bucket: String,
    /// Key of the history text object.
    pub history_key: String,
    /// Prefix under which history images live.
    pub images_prefix: String,
    /// File extensions accepted as images.
    pub image_extensions: Vec<String>,
    /// Browsable sections (each a top-level prefix in the bucket).
    pub sections: Vec<String>,
}

impl Default for ContentSettings {
    fn default() -> Self {
        Self {
            bucket: "f1wikipedia".to_string(),
            history_key: "History/f1_history.txt".to_string(),
            images_prefix: "History/images/".to_string(),
            image_extensions: vec!["jpg".to_string(), "png".to_string(), "jpeg".to_string()],
            sections: vec!["Drivers".to_string(), "Tracks".to_string()],
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding provider (openai).
    pub provider: String,
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions.
    pub dimensions: u32,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "text-embedding-ada-002".to_string(),
            dimensions: 1536,
        }
    }
}

/// Vector index settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    /// Names of the regulation indexes, queried in order.
    pub names: Vec<String>,
    /// Data-plane base URL for each index.
    pub hosts: HashMap<String, String>,
    /// Vector dimension used when provisioning.
    pub dimension: u32,
    /// Similarity metric used when provisioning.
    pub metric: String,
    /// Serverless cloud used when provisioning.
    pub cloud: String,
}

impl Default for IndexSettings {
    fn default() -> Self {
        let names = vec![
            "sporting-regulations-embeddings".to_string(),
            "technical-regulations-embeddings".to_string(),
            "financial-regulations-embeddings".to_string(),
        ];

        let hosts = names
            .iter()
            .map(|name| {
                (
                    name.clone(),
                    format!("https://{}-jl357j9.svc.aped-4627-b74a.pinecone.io", name),
                )
            })
            .collect();

        Self {
            names,
            hosts,
            dimension: 1536,
            metric: "cosine".to_string(),
            cloud: "aws".to_string(),
        }
    }
}

/// Hybrid retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Nearest neighbors requested from each index.
    pub per_index_top_k: usize,
    /// Matches kept per index after the keyword-first merge.
    pub per_index_limit: usize,
    /// Matches kept after ranking across all indexes.
    pub final_limit: usize,
    /// Unique text blocks included in the assembled context.
    pub max_context_blocks: usize,
    /// Keywords prioritized during the merge.
    pub keywords: Vec<String>,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            per_index_top_k: 10,
            per_index_limit: 5,
            final_limit: 5,
            max_context_blocks: 3,
            keywords: Vec::new(),
        }
    }
}

/// Answer synthesis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagSettings {
    /// LLM model for answer generation.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum output tokens per answer.
    pub max_tokens: u32,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            temperature: 0.7,
            max_tokens: 5000,
        }
    }
}

/// News feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsSettings {
    /// Search query sent to the news API.
    pub query: String,
    /// Maximum articles returned.
    pub max_articles: usize,
}

impl Default for NewsSettings {
    fn default() -> Self {
        Self {
            query: "\"Formula 1\" OR F1".to_string(),
            max_articles: 9,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::PaddockError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("paddock")
            .join("config.toml")
    }

    /// Data-plane base URL for an index, if configured.
    pub fn index_host(&self, name: &str) -> Option<&str> {
        self.index.hosts.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_indexes() {
        let settings = Settings::default();
        assert_eq!(settings.index.names.len(), 3);
        assert_eq!(settings.index.dimension, 1536);
        assert_eq!(settings.index.metric, "cosine");
        for name in &settings.index.names {
            let host = settings.index_host(name).expect("host configured");
            assert!(host.starts_with("https://"));
        }
    }

    #[test]
    fn test_default_retrieval_limits() {
        let retrieval = RetrievalSettings::default();
        assert_eq!(retrieval.per_index_top_k, 10);
        assert_eq!(retrieval.final_limit, 5);
        assert_eq!(retrieval.max_context_blocks, 3);
        assert!(retrieval.keywords.is_empty());
    }

    #[test]
    fn test_partial_config_parses() {
        let settings: Settings = toml::from_str(
            r#"
            [rag]
            model = "gpt-4o"
            "#,
        )
        .unwrap();
        assert_eq!(settings.rag.model, "gpt-4o");
        assert_eq!(settings.rag.max_tokens, 5000);
        assert_eq!(settings.content.bucket, "f1wikipedia");
    }
}
