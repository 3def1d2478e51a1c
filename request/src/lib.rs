use serde::{Deserialize, Serialize};

pub mod chat_request;
pub mod message;

pub use chat_request::{ChatRequest, RequestFormatError, parse_chat_request};
pub use message::{Message, Role};

/// Body of an OpenAI-compatible `POST /chat/completions` call.
///
/// `stop` is always serialized, as `null` when unset, and `stream` is a plain
/// bool because the relay never asks for a streamed reply.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ChatCompletionsRequest {
    pub messages: Vec<Message>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub stop: Option<Vec<String>>,
    pub stream: bool,
}

/// Generation parameters applied to every relayed conversation.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationParameters {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl ChatCompletionsRequest {
    pub fn new(messages: Vec<Message>, parameters: &GenerationParameters) -> Self {
        Self {
            messages,
            model: parameters.model.clone(),
            max_tokens: parameters.max_tokens,
            temperature: parameters.temperature,
            top_p: parameters.top_p,
            stop: None,
            stream: false,
        }
    }
}
