//! Search command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(query: &str, keywords: &[String], settings: Settings) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Search) {
        Output::error(&format!("{}", e));
        Output::info("Run 'paddock doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let keywords = if keywords.is_empty() {
        settings.retrieval.keywords.clone()
    } else {
        keywords.to_vec()
    };

    let orchestrator = Orchestrator::new(settings).await?;

    let spinner = Output::spinner("Searching...");
    let matches = orchestrator.search(query, &keywords).await;
    spinner.finish_and_clear();

    if matches.is_empty() {
        Output::warning("No results found matching your query.");
    } else {
        Output::success(&format!("Found {} results", matches.len()));
        for m in &matches {
            Output::match_result(&m.source_index, m.score, &m.text);
        }
    }

    Ok(())
}
