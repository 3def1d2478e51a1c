use chat::GroqChatCompletionsProvider;
use server::{AppState, config::Settings, get_app};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv_path = dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    info!("Initializing Groq chat relay");

    if let Some(path) = dotenv_path {
        info!("Loaded environment from {}", path.display());
    }

    let settings = Settings::load()?;
    info!(
        "model: {}, max_tokens: {}, temperature: {}, top_p: {}",
        settings.generation.model,
        settings.generation.max_tokens,
        settings.generation.temperature,
        settings.generation.top_p
    );

    let provider = GroqChatCompletionsProvider::new(&settings.base_url, &settings.api_key);
    info!(
        "Relaying chat completions to {}",
        provider.chat_completions_url()
    );

    let addr = format!("{}:{}", settings.host, settings.port);
    let state = Arc::new(AppState {
        settings,
        provider: Arc::new(provider),
    });
    let app = get_app(state);

    info!("Routes configured, binding to {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server started successfully, listening for requests");

    axum::serve(listener, app).await?;

    Ok(())
}
