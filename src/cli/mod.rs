//! CLI module for Paddock.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Paddock - F1 Encyclopedia and Regulations Q&A
///
/// Browse Formula 1 history and ask natural-language questions about the
/// sporting, technical, and financial regulations.
#[derive(Parser, Debug)]
#[command(name = "paddock")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Provision the regulation indexes (create-if-absent)
    Init,

    /// Check credentials and configuration
    Doctor,

    /// Ask a question about the F1 regulations
    Ask {
        /// The question to ask
        question: String,

        /// LLM model to use for answer generation
        #[arg(short, long)]
        model: Option<String>,

        /// Keyword to prioritize during retrieval (repeatable)
        #[arg(long = "keyword")]
        keywords: Vec<String>,

        /// Print the retrieved context alongside the answer
        #[arg(long)]
        show_context: bool,
    },

    /// Retrieve regulation snippets without generating an answer
    Search {
        /// Search query
        query: String,

        /// Keyword to prioritize during retrieval (repeatable)
        #[arg(long = "keyword")]
        keywords: Vec<String>,
    },

    /// Start an interactive question session
    Chat,

    /// Print the F1 history encyclopedia entry
    History,

    /// Browse driver and track profiles
    Library {
        /// Section to browse (Drivers, Tracks)
        #[arg(short, long, default_value = "Drivers")]
        section: String,

        /// Show a single item instead of the listing
        #[arg(short, long)]
        item: Option<String>,
    },

    /// Show recent F1 news headlines
    News,

    /// Start the web UI and JSON API server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
