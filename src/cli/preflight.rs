//! Pre-flight credential checks.
//!
//! Validates that the external-service credentials an operation needs are
//! present before any network call is made or any UI renders. Missing
//! credentials abort immediately.

use crate::error::{PaddockError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Question answering needs OpenAI and the vector indexes.
    Ask,
    /// Retrieval-only search needs OpenAI and the vector indexes.
    Search,
    /// Index provisioning needs the vector-search service only.
    Provision,
    /// Content browsing needs the object store.
    Content,
    /// News needs the news API key.
    News,
    /// The server needs every required credential up front.
    Serve,
}

/// Run pre-flight checks for the given operation.
pub fn check(operation: Operation) -> Result<()> {
    match operation {
        Operation::Ask | Operation::Search => {
            check_openai()?;
            check_pinecone()?;
        }
        Operation::Provision => {
            check_pinecone()?;
        }
        Operation::Content => {
            check_aws()?;
        }
        Operation::News => {
            check_env("NEWSAPI_API_KEY", "export NEWSAPI_API_KEY='...'")?;
        }
        Operation::Serve => {
            check_openai()?;
            check_pinecone()?;
            check_aws()?;
        }
    }
    Ok(())
}

fn check_openai() -> Result<()> {
    check_env("OPENAI_API_KEY", "export OPENAI_API_KEY='sk-...'")
}

fn check_pinecone() -> Result<()> {
    check_env("PINECONE_API_KEY", "export PINECONE_API_KEY='...'")?;
    check_env("PINECONE_ENV", "export PINECONE_ENV='us-east-1'")
}

fn check_aws() -> Result<()> {
    check_env("AWS_ACCESS_KEY_ID", "export AWS_ACCESS_KEY_ID='...'")?;
    check_env("AWS_SECRET_ACCESS_KEY", "export AWS_SECRET_ACCESS_KEY='...'")?;
    check_env("AWS_REGION", "export AWS_REGION='us-east-1'")
}

fn check_env(name: &str, hint: &str) -> Result<()> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(()),
        Ok(_) => Err(PaddockError::Config(format!(
            "{} is empty. Set it with: {}",
            name, hint
        ))),
        Err(_) => Err(PaddockError::Config(format!(
            "{} not set. Set it with: {}",
            name, hint
        ))),
    }
}
