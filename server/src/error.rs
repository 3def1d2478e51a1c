use axum::{
    Json,
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chat::ProviderError;
use request::RequestFormatError;
use response::{ErrorResponse, ExtractError};
use tracing::{error, warn};

pub const INVALID_REQUEST_FORMAT: &str = "Invalid request format";

/// Request-level failures of `/api/chat`.
///
/// Unreadable bodies and client format errors always render the same fixed message; upstream errors
/// render the underlying error's message.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{}", INVALID_REQUEST_FORMAT)]
    UnreadableBody(#[from] BytesRejection),
    #[error("{}", INVALID_REQUEST_FORMAT)]
    InvalidRequest(#[from] RequestFormatError),
    #[error("{0}")]
    Upstream(anyhow::Error),
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        Self::Upstream(err.into())
    }
}

impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        Self::Upstream(err.into())
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UnreadableBody(_) | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            Self::UnreadableBody(err) => warn!("Failed to read chat request body: {err:?}"),
            Self::InvalidRequest(err) => warn!("Rejected chat request: {err:?}"),
            Self::Upstream(err) => error!("Error: {err:?}"),
        }

        let status = self.status_code();
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}
