//! Interactive question session.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::rag::ANSWER_UNAVAILABLE;
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};

/// Run the interactive chat command.
///
/// Each question goes through the full retrieval pipeline independently;
/// there is no conversation history.
pub async fn run_chat(settings: Settings) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Ask) {
        Output::error(&format!("{}", e));
        Output::info("Run 'paddock doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let keywords = settings.retrieval.keywords.clone();
    let orchestrator = Orchestrator::new(settings).await?;

    println!("\n{}", style("Paddock Pal").bold().cyan());
    println!(
        "{}\n",
        style("Ask about the F1 regulations, or type 'exit' to quit.").dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        let spinner = Output::spinner("Thinking...");
        match orchestrator.ask_with_keywords(input, &keywords).await {
            Ok(outcome) => {
                spinner.finish_and_clear();
                println!("\n{} {}\n", style("Paddock:").cyan().bold(), outcome.answer);
            }
            Err(e) => {
                spinner.finish_and_clear();
                Output::error(&format!("{}", e));
                println!("\n{} {}\n", style("Paddock:").cyan().bold(), ANSWER_UNAVAILABLE);
            }
        }
    }

    Ok(())
}
