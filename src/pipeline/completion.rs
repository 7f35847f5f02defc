use super::error::ValidationError;
use super::stage::Stage;
use crate::llm::{ChatMessage, LLMClient, LLMRequest};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Raw text returned by one completion call
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub latency: Duration,
}

/// Sends one system prompt and one user message to the model
///
/// The returned text is not guaranteed to be JSON. Retries are the caller's
/// concern.
#[derive(Clone)]
pub struct CompletionClient {
    llm: Arc<dyn LLMClient>,
    temperature: f32,
    max_tokens: u32,
}

impl CompletionClient {
    pub fn new(llm: Arc<dyn LLMClient>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            llm,
            temperature,
            max_tokens,
        }
    }

    pub fn backend_name(&self) -> &str {
        self.llm.name()
    }

    pub fn model_info(&self) -> Option<String> {
        self.llm.model_info()
    }

    pub async fn complete(
        &self,
        stage: Stage,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<Completion, ValidationError> {
        if system_prompt.trim().is_empty() || user_message.trim().is_empty() {
            return Err(ValidationError::InvalidInput(format!(
                "{} stage prompt must not be empty",
                stage
            )));
        }

        let request = LLMRequest::new(vec![
            ChatMessage::system(system_prompt),
            ChatMessage::user(user_message),
        ])
        .with_temperature(self.temperature)
        .with_max_tokens(self.max_tokens);

        debug!(stage = %stage, backend = self.llm.name(), "Sending completion request");

        let response = self
            .llm
            .chat(request)
            .await
            .map_err(|source| ValidationError::CompletionFailure { stage, source })?;

        Ok(Completion {
            text: response.content,
            latency: response.response_time,
        })
    }
}

impl std::fmt::Debug for CompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionClient")
            .field("backend", &self.llm.name())
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}
