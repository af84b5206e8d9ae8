//! Paddock - F1 Encyclopedia and Regulations Q&A
//!
//! A CLI tool and web app for browsing Formula 1 historical content and
//! asking natural-language questions about F1 regulations.
//!
//! # Overview
//!
//! Paddock allows you to:
//! - Browse the F1 history encyclopedia and driver/track profiles stored
//!   in an S3 bucket
//! - Ask questions about the sporting, technical, and financial
//!   regulations and get AI-generated answers
//! - Inspect the retrieved context behind every answer
//! - Serve the whole thing as a small three-page web UI
//!
//! Answers are produced with retrieval-augmented generation: the question
//! is embedded, the three regulation indexes are searched for the nearest
//! neighbors, and the highest-scoring snippets are handed to a chat model
//! as context.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `content` - Object-store content loading and caching
//! - `embedding` - Embedding generation
//! - `index` - Vector index client and provisioning
//! - `retrieval` - Hybrid retrieval and context assembly
//! - `rag` - Answer synthesis
//! - `news` - F1 news feed
//! - `orchestrator` - Component wiring
//!
//! # Example
//!
//! ```rust,no_run
//! use paddock::config::Settings;
//! use paddock::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings).await?;
//!
//!     orchestrator.provision().await?;
//!     let outcome = orchestrator.ask("What are the minimum weight regulations?").await?;
//!     println!("{}", outcome.answer);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod content;
pub mod embedding;
pub mod error;
pub mod index;
pub mod news;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod retrieval;

pub use error::{PaddockError, Result};
