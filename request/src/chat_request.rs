use serde_json::Value;
use thiserror::Error;

use crate::Message;

/// A validated `/api/chat` payload.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
}

#[derive(Debug, Error)]
pub enum RequestFormatError {
    #[error("request body is empty")]
    Empty,
    #[error("request body is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),
    #[error("request body must be a JSON object, found {0}")]
    NotAnObject(&'static str),
    #[error("request body has no `messages` field")]
    MissingMessages,
    #[error("`messages` is malformed: {0}")]
    MalformedMessages(#[source] serde_json::Error),
    #[error("`messages` contains no conversation turns")]
    NoMessages,
}

/// Parses a raw request body into a [`ChatRequest`].
///
/// Accepts only a non-empty JSON object whose `messages` field is a non-empty
/// array of role/content pairs. Other top-level keys are ignored.
pub fn parse_chat_request(body: &[u8]) -> Result<ChatRequest, RequestFormatError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(RequestFormatError::Empty);
    }

    let value: Value = serde_json::from_slice(body).map_err(RequestFormatError::Json)?;
    let mut object = match value {
        Value::Object(object) if object.is_empty() => return Err(RequestFormatError::Empty),
        Value::Object(object) => object,
        Value::Null => return Err(RequestFormatError::Empty),
        Value::Bool(_) => return Err(RequestFormatError::NotAnObject("a boolean")),
        Value::Number(_) => return Err(RequestFormatError::NotAnObject("a number")),
        Value::String(_) => return Err(RequestFormatError::NotAnObject("a string")),
        Value::Array(_) => return Err(RequestFormatError::NotAnObject("an array")),
    };

    let messages = object
        .remove("messages")
        .ok_or(RequestFormatError::MissingMessages)?;
    let messages: Vec<Message> =
        serde_json::from_value(messages).map_err(RequestFormatError::MalformedMessages)?;

    if messages.is_empty() {
        return Err(RequestFormatError::NoMessages);
    }

    Ok(ChatRequest { messages })
}
