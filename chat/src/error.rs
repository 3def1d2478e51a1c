use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("Error code: {} - {message}", .status.as_u16())]
    Status { status: StatusCode, message: String },
    #[error("failed to decode completion response: {0}")]
    Decode(#[source] serde_json::Error),
}
