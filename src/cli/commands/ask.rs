//! Ask command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::rag::ANSWER_UNAVAILABLE;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(
    question: &str,
    model: Option<String>,
    keywords: &[String],
    show_context: bool,
    mut settings: Settings,
) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Ask) {
        Output::error(&format!("{}", e));
        Output::info("Run 'paddock doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    if let Some(model) = model {
        settings.rag.model = model;
    }

    let keywords = if keywords.is_empty() {
        settings.retrieval.keywords.clone()
    } else {
        keywords.to_vec()
    };

    let orchestrator = Orchestrator::new(settings).await?;

    let spinner = Output::spinner("Searching the regulations...");

    match orchestrator.ask_with_keywords(question, &keywords).await {
        Ok(outcome) => {
            spinner.finish_and_clear();

            println!("\n{}\n", outcome.answer);

            if show_context && !outcome.context.is_empty() {
                Output::header("Context");
                println!("{}", outcome.context);
            }

            if !outcome.matches.is_empty() {
                Output::header("Sources");
                for m in &outcome.matches {
                    Output::match_result(&m.source_index, m.score, &m.text);
                }
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to generate answer: {}", e));
            println!("\n{}\n", ANSWER_UNAVAILABLE);
        }
    }

    Ok(())
}
