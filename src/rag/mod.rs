//! Answer synthesis from retrieved context.

use crate::config::{Prompts, RagSettings};
use crate::error::{PaddockError, Result};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Answer returned when retrieval produced no usable context.
pub const NO_CONTEXT_ANSWER: &str = "No relevant information found in the database.";

/// Answer shown to the user when generation fails.
pub const ANSWER_UNAVAILABLE: &str = "An error occurred while generating the answer.";

/// Engine wrapping the chat-completion endpoint.
pub struct RagEngine {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    settings: RagSettings,
    prompts: Prompts,
}

impl RagEngine {
    /// Create an engine with the given sampling settings.
    pub fn new(settings: RagSettings) -> Self {
        Self {
            client: create_client(),
            settings,
            prompts: Prompts::default(),
        }
    }

    /// Set custom prompts.
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Generate an answer for a question given assembled context.
    ///
    /// Empty context short-circuits to [`NO_CONTEXT_ANSWER`] without
    /// calling the completion API. Call failures surface as typed errors;
    /// the presentation layer decides how to display them (typically as
    /// [`ANSWER_UNAVAILABLE`]).
    #[instrument(skip(self, context), fields(question = %question))]
    pub async fn answer(&self, context: &str, question: &str) -> Result<String> {
        if context.is_empty() {
            return Ok(NO_CONTEXT_ANSWER.to_string());
        }

        let mut vars = HashMap::new();
        vars.insert("context".to_string(), context.to_string());
        vars.insert("question".to_string(), question.to_string());
        let user_prompt = Prompts::render(&self.prompts.rag.user, &vars);

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.prompts.rag.system.clone())
                .build()
                .map_err(|e| PaddockError::Rag(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_prompt)
                .build()
                .map_err(|e| PaddockError::Rag(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.settings.model)
            .messages(messages)
            .temperature(self.settings.temperature)
            .max_completion_tokens(self.settings.max_tokens)
            .build()
            .map_err(|e| PaddockError::Rag(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| PaddockError::OpenAI(format!("Failed to generate answer: {}", e)))?;

        let answer = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| PaddockError::Rag("Empty response from LLM".to_string()))?
            .trim()
            .to_string();

        debug!("Generated answer ({} chars)", answer.len());
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_context_short_circuits() {
        // No API key, no network: an empty context must never reach the
        // completion endpoint.
        let engine = RagEngine::new(RagSettings::default());
        let answer = engine.answer("", "What is the minimum weight?").await.unwrap();
        assert_eq!(answer, NO_CONTEXT_ANSWER);
    }
}
