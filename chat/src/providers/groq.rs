use async_trait::async_trait;
use request::ChatCompletionsRequest;
use reqwest::Client;
use response::ChatCompletionsResponse;
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::error::ProviderError;
use crate::providers::ChatCompletionsProvider;

pub const GROQ_API_BASE_URL: &str = "https://api.groq.com/openai/v1";

pub struct GroqChatCompletionsProvider {
    api_key: String,
    chat_completions_url: String,
    client: Client,
}

impl GroqChatCompletionsProvider {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            chat_completions_url: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            client: Client::new(),
        }
    }

    pub fn chat_completions_url(&self) -> &str {
        &self.chat_completions_url
    }
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Prefers the `error.message` of an OpenAI-style error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) => body.trim().to_string(),
    }
}

#[async_trait]
impl ChatCompletionsProvider for GroqChatCompletionsProvider {
    async fn chat_completions(
        &self,
        request: ChatCompletionsRequest,
    ) -> Result<ChatCompletionsResponse, ProviderError> {
        debug!(
            "Sending chat completion request with model: {}, messages: {}",
            request.model,
            request.messages.len()
        );

        let response = self
            .client
            .post(&self.chat_completions_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        debug!("Groq API response status: {}", status);
        let body = response.text().await?;

        if !status.is_success() {
            error!("Groq API error: {} - {}", status, body);
            return Err(ProviderError::Status {
                status,
                message: error_message(&body),
            });
        }

        let completion: ChatCompletionsResponse =
            serde_json::from_str(&body).map_err(ProviderError::Decode)?;

        if let Some(usage) = &completion.usage {
            info!(
                "Usage: prompt_tokens: {}, completion_tokens: {}, total_tokens: {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        Ok(completion)
    }
}
