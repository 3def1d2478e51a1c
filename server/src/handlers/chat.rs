use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
};
use request::{ChatCompletionsRequest, parse_chat_request};
use response::ChatResponse;
use std::sync::Arc;
use tracing::{debug, info};

use crate::AppState;
use crate::error::AppError;

/// `POST /api/chat`: validates the conversation, relays it once, returns the first reply.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let body = body?;
    let chat_request = parse_chat_request(&body)?;
    info!(
        "Received chat request with {} messages",
        chat_request.messages.len()
    );

    let request = ChatCompletionsRequest::new(chat_request.messages, &state.settings.generation);
    let completion = state.provider.chat_completions(request).await?;
    let chat_response = ChatResponse::try_from(completion)?;

    debug!(
        "Relaying reply of {} bytes, completion_time: {:?}",
        chat_response.message.len(),
        chat_response.completion_time
    );

    Ok(Json(chat_response))
}
