//! Configuration module for Paddock.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, RagPrompts};
pub use settings::{
    ContentSettings, EmbeddingSettings, GeneralSettings, IndexSettings, NewsSettings,
    RagSettings, RetrievalSettings, Settings,
};
