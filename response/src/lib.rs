use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Non-streamed reply of an OpenAI-compatible `POST /chat/completions`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ChatCompletionsResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Choice {
    #[serde(default)]
    pub index: i32,
    pub message: ChoiceMessage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ChoiceMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub content: Option<String>,
}

/// Token counts plus the timing fields Groq adds to `usage`, in seconds.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Usage {
    #[serde(default)]
    pub completion_tokens: i32,
    #[serde(default)]
    pub prompt_tokens: i32,
    #[serde(default)]
    pub total_tokens: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_time: Option<f64>,
}

impl ChatCompletionsResponse {
    pub fn builder() -> ChatCompletionsResponseBuilder {
        ChatCompletionsResponseBuilder::default()
    }
}

#[derive(Default)]
pub struct ChatCompletionsResponseBuilder {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

impl ChatCompletionsResponseBuilder {
    /// Appends an assistant choice with the given content.
    pub fn content(mut self, content: impl Into<String>) -> Self {
        let index = self.choices.len() as i32;
        self.choices.push(Choice {
            index,
            message: ChoiceMessage {
                role: Some("assistant".to_string()),
                content: Some(content.into()),
            },
            finish_reason: Some("stop".to_string()),
        });
        self
    }

    pub fn completion_time(mut self, completion_time: f64) -> Self {
        self.usage.get_or_insert_with(Usage::default).completion_time = Some(completion_time);
        self
    }

    pub fn build(self) -> ChatCompletionsResponse {
        ChatCompletionsResponse {
            choices: self.choices,
            created: None,
            id: None,
            model: None,
            object: Some("chat.completion".to_string()),
            usage: self.usage,
        }
    }
}

/// Successful `/api/chat` reply.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ChatResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<f64>,
}

/// Failed `/api/chat` reply.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ExtractError {
    #[error("completion response contained no choices")]
    NoChoices,
    #[error("completion response choice had no message content")]
    NoContent,
}

impl TryFrom<ChatCompletionsResponse> for ChatResponse {
    type Error = ExtractError;

    fn try_from(response: ChatCompletionsResponse) -> Result<Self, Self::Error> {
        let completion_time = response.usage.and_then(|usage| usage.completion_time);
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(ExtractError::NoChoices)?;
        let message = choice.message.content.ok_or(ExtractError::NoContent)?;

        Ok(Self {
            message,
            completion_time,
        })
    }
}
