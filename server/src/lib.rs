use axum::{
    Router,
    routing::{get, post},
};
use chat::ChatCompletionsProvider;
use std::sync::Arc;

pub mod config;
pub mod error;
pub mod handlers;

use crate::config::Settings;

pub struct AppState {
    pub settings: Settings,
    pub provider: Arc<dyn ChatCompletionsProvider>,
}

pub fn get_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index::index))
        .route("/api/chat", post(handlers::chat::chat))
        .with_state(state)
}
