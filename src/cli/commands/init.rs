//! Init command - provision the regulation indexes.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the init command.
pub async fn run_init(settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Provision) {
        Output::error(&format!("{}", e));
        Output::info("Run 'paddock doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings).await?;

    let spinner = Output::spinner("Provisioning indexes...");
    let report = orchestrator.provision().await?;
    spinner.finish_and_clear();

    for name in &report.created {
        Output::success(&format!("Created index {}", name));
    }
    for name in &report.existing {
        Output::info(&format!("Index {} already exists", name));
    }

    Ok(())
}
