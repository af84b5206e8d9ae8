//! Shared OpenAI client construction.

use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Timeout applied to embedding and chat-completion requests (5 minutes).
const REQUEST_TIMEOUT_SECS: u64 = 300;

/// Create the OpenAI client used for embeddings and answer synthesis.
///
/// Reads `OPENAI_API_KEY` from the environment. The timeout keeps a
/// stalled completion from hanging a page render indefinitely.
pub fn create_client() -> Client<OpenAIConfig> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .expect("Failed to create HTTP client");

    Client::with_config(OpenAIConfig::default()).with_http_client(http_client)
}
