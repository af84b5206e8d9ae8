//! News command - show recent F1 headlines.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::news::NewsClient;
use anyhow::Result;

/// Run the news command.
pub async fn run_news(settings: Settings) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::News) {
        Output::error(&format!("{}", e));
        Output::info("Run 'paddock doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let client = NewsClient::from_env(settings.news.clone())
        .ok_or_else(|| anyhow::anyhow!("NEWSAPI_API_KEY is not set"))?;

    let spinner = Output::spinner("Fetching headlines...");
    let articles = match client.fetch().await {
        Ok(articles) => {
            spinner.finish_and_clear();
            articles
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to fetch news: {}", e));
            return Err(e.into());
        }
    };

    if articles.is_empty() {
        Output::info("No recent F1 headlines found.");
        return Ok(());
    }

    Output::header(&format!("F1 News ({})", articles.len()));
    for article in &articles {
        println!();
        Output::list_item(&article.title);
        if let Some(description) = &article.description {
            println!("    {}", description);
        }
        Output::kv("link", &article.url);
    }

    Ok(())
}
