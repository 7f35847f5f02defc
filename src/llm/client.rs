use super::error::BackendError;
use super::types::{LLMRequest, LLMResponse};
use async_trait::async_trait;

/// Seam between the pipeline and a chat model
///
/// One call sends the whole conversation (a system prompt and a user message
/// for every stage) and returns the raw reply text.
#[async_trait]
pub trait LLMClient: Send + Sync {
    async fn chat(&self, request: LLMRequest) -> Result<LLMResponse, BackendError>;

    /// Short backend label used in logs
    fn name(&self) -> &str;

    fn model_info(&self) -> Option<String> {
        None
    }
}
