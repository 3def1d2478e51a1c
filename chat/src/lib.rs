pub mod error;
pub mod providers;

pub use error::ProviderError;
pub use providers::ChatCompletionsProvider;
pub use providers::groq::{GROQ_API_BASE_URL, GroqChatCompletionsProvider};
