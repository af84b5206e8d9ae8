//! Library command - browse driver and track profiles.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::content::{ContentCache, ContentStore, S3ContentStore};
use anyhow::Result;
use std::sync::Arc;

/// Run the library command.
pub async fn run_library(section: &str, item: Option<String>, settings: Settings) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Content) {
        Output::error(&format!("{}", e));
        Output::info("Run 'paddock doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    // Sections are fixed prefixes in the bucket; reject anything else
    // before issuing a listing.
    let section = settings
        .content
        .sections
        .iter()
        .find(|s| s.eq_ignore_ascii_case(section))
        .cloned()
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown section '{}'. Available: {}",
                section,
                settings.content.sections.join(", ")
            )
        })?;

    let store: Arc<dyn ContentStore> =
        Arc::new(S3ContentStore::new(settings.content.clone()).await);
    let cache = ContentCache::new(store);

    let spinner = Output::spinner(&format!("Loading {}...", section));
    let items = match cache.section(&section).await {
        Ok(items) => {
            spinner.finish_and_clear();
            items
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::warning(&format!("Could not load content: {}", e));
            return Err(e.into());
        }
    };

    match item {
        Some(name) => {
            let found = items
                .iter()
                .find(|i| i.name.eq_ignore_ascii_case(&name) || display_name(&i.name).eq_ignore_ascii_case(&name));

            match found {
                Some(entry) => {
                    Output::header(&display_name(&entry.name));
                    if entry.image.is_some() {
                        Output::info("Profile image available in the web UI.");
                    }
                    println!(
                        "\n{}\n",
                        entry.content.as_deref().unwrap_or("No content available.")
                    );
                }
                None => {
                    Output::warning(&format!("No entry named '{}' in {}.", name, section));
                }
            }
        }
        None => {
            Output::header(&format!("{} ({})", section, items.len()));
            println!();
            for entry in items.iter() {
                Output::list_item(&display_name(&entry.name));
            }
        }
    }

    Ok(())
}

/// "Lewis_Hamilton" -> "Lewis Hamilton".
fn display_name(name: &str) -> String {
    name.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("Lewis_Hamilton"), "Lewis Hamilton");
        assert_eq!(display_name("Monza"), "Monza");
    }
}
