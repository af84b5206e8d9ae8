//! History command - print the encyclopedia entry.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::content::{ContentCache, ContentStore, S3ContentStore};
use anyhow::Result;
use std::sync::Arc;

/// Run the history command.
pub async fn run_history(settings: Settings) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Content) {
        Output::error(&format!("{}", e));
        Output::info("Run 'paddock doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let store: Arc<dyn ContentStore> =
        Arc::new(S3ContentStore::new(settings.content.clone()).await);
    let cache = ContentCache::new(store);

    let spinner = Output::spinner("Loading encyclopedia content...");
    let bundle = match cache.history().await {
        Ok(bundle) => {
            spinner.finish_and_clear();
            bundle
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::warning(&format!("Could not load content: {}", e));
            return Err(e.into());
        }
    };

    Output::header("The History of Formula 1");
    println!("\n{}\n", bundle.text);

    if !bundle.images.is_empty() {
        Output::header(&format!("Images ({})", bundle.images.len()));
        for image in &bundle.images {
            Output::list_item(&format!(
                "{} ({} KB)",
                image.file_name(),
                image.bytes.len() / 1024
            ));
        }
    }

    Ok(())
}
