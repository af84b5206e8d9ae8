//! Doctor command - verify credentials and configuration.

use crate::cli::Output;
use crate::config::Settings;
use crate::index::{PineconeIndexProvider, VectorIndexProvider};
use console::style;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub async fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Paddock Doctor");
    println!();
    println!("Checking credentials and configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("API Credentials").bold());
    let credential_checks = vec![
        check_openai_api_key(),
        check_key("PINECONE_API_KEY", "export PINECONE_API_KEY='...'"),
        check_key("PINECONE_ENV", "export PINECONE_ENV='us-east-1'"),
        check_key("AWS_ACCESS_KEY_ID", "export AWS_ACCESS_KEY_ID='...'"),
        check_key("AWS_SECRET_ACCESS_KEY", "export AWS_SECRET_ACCESS_KEY='...'"),
        check_key("AWS_REGION", "export AWS_REGION='us-east-1'"),
        check_optional_key("NEWSAPI_API_KEY", "Needed only for the news page"),
    ];
    for check in &credential_checks {
        check.print();
    }
    checks.extend(credential_checks);

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file();
    config_check.print();
    checks.push(config_check);

    println!();

    println!("{}", style("Vector Indexes").bold());
    let index_checks = check_indexes(settings).await;
    for check in &index_checks {
        check.print();
    }
    checks.extend(index_checks);

    println!();

    // Summary
    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Paddock.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Paddock is ready to use.");
    }

    Ok(())
}

/// Check if the OpenAI API key is configured.
fn check_openai_api_key() -> CheckResult {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if key.starts_with("sk-") && key.len() > 20 => {
            let masked = format!("{}...{}", &key[..7], &key[key.len() - 4..]);
            CheckResult::ok("OPENAI_API_KEY", &format!("configured ({})", masked))
        }
        Ok(key) if key.is_empty() => CheckResult::error(
            "OPENAI_API_KEY",
            "empty",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
        Ok(_) => CheckResult::warning(
            "OPENAI_API_KEY",
            "set but format looks unusual",
            "Expected format: sk-... (OpenAI API key)",
        ),
        Err(_) => CheckResult::error(
            "OPENAI_API_KEY",
            "not set",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
    }
}

/// Check a required credential.
fn check_key(name: &str, hint: &str) -> CheckResult {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => CheckResult::ok(name, "configured"),
        Ok(_) => CheckResult::error(name, "empty", &format!("Set with: {}", hint)),
        Err(_) => CheckResult::error(name, "not set", &format!("Set with: {}", hint)),
    }
}

/// Check an optional credential.
fn check_optional_key(name: &str, hint: &str) -> CheckResult {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => CheckResult::ok(name, "configured"),
        _ => CheckResult::warning(name, "not set", hint),
    }
}

/// Check if the config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: paddock config show > config.toml",
        )
    }
}

/// Check that the configured regulation indexes exist.
async fn check_indexes(settings: &Settings) -> Vec<CheckResult> {
    let provider = match PineconeIndexProvider::from_env(&settings.index) {
        Ok(provider) => provider,
        Err(_) => {
            return vec![CheckResult::warning(
                "Indexes",
                "skipped",
                "Set PINECONE_API_KEY and PINECONE_ENV to check index reachability",
            )];
        }
    };

    let existing = match provider.list_indexes().await {
        Ok(existing) => existing,
        Err(e) => {
            return vec![CheckResult::error(
                "Indexes",
                &format!("unreachable: {}", e),
                "Check your Pinecone credentials and network connection",
            )];
        }
    };

    settings
        .index
        .names
        .iter()
        .map(|name| {
            if existing.iter().any(|e| e == name) {
                CheckResult::ok(name, "exists")
            } else {
                CheckResult::warning(name, "missing", "Create with: paddock init")
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_ok() {
        let result = CheckResult::ok("test", "passed");
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }
}
