use async_trait::async_trait;
use request::ChatCompletionsRequest;
use response::ChatCompletionsResponse;

use crate::error::ProviderError;

pub mod groq;

/// A remote chat-completion service.
///
/// Each call is a single attempt; implementations do not retry.
#[async_trait]
pub trait ChatCompletionsProvider: Send + Sync {
    async fn chat_completions(
        &self,
        request: ChatCompletionsRequest,
    ) -> Result<ChatCompletionsResponse, ProviderError>;
}
