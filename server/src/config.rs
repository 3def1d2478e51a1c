use chat::GROQ_API_BASE_URL;
use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use request::GenerationParameters;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_MODEL_ID: &str = "llama3-8b-8192";
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_TEMPERATURE: f32 = 0.5;
pub const DEFAULT_TOP_P: f32 = 1.0;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 7777;

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
    #[error("{name} is out of range: {value}")]
    OutOfRange { name: &'static str, value: String },
}

/// Process-wide settings, loaded once at startup and read-only afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub api_key: String,
    pub base_url: String,
    pub generation: GenerationParameters,
    pub host: String,
    pub port: u16,
}

/// Shape of the merged sources. Keys are the lowercased environment variable names.
#[derive(Debug, Deserialize)]
struct RawSettings {
    groq_api_key: Option<String>,
    groq_model_id: Option<String>,
    groq_base_url: String,
    max_tokens: i64,
    temperature: f32,
    top_p: f32,
    host: String,
    port: u16,
}

fn with_defaults() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
    Config::builder()
        .set_default("groq_model_id", DEFAULT_MODEL_ID)?
        .set_default("groq_base_url", GROQ_API_BASE_URL)?
        .set_default("max_tokens", i64::from(DEFAULT_MAX_TOKENS))?
        .set_default("temperature", f64::from(DEFAULT_TEMPERATURE))?
        .set_default("top_p", f64::from(DEFAULT_TOP_P))?
        .set_default("host", DEFAULT_HOST)?
        .set_default("port", i64::from(DEFAULT_PORT))
}

fn non_empty(value: Option<String>, name: &'static str) -> Result<String, ConfigurationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigurationError::Missing(name)),
    }
}

impl Settings {
    /// Loads settings from an optional `config` file overlaid by the process environment.
    pub fn load() -> Result<Self, ConfigurationError> {
        let settings = with_defaults()?
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::default())
            .build()?;

        Self::from_raw(settings.try_deserialize()?)
    }

    /// Loads settings from the given variables instead of the process environment.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let source: config::Map<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let settings = with_defaults()?
            .add_source(Environment::default().source(Some(source)))
            .build()?;

        Self::from_raw(settings.try_deserialize()?)
    }

    fn from_raw(raw: RawSettings) -> Result<Self, ConfigurationError> {
        let api_key = non_empty(raw.groq_api_key, "GROQ_API_KEY")?;
        let model = non_empty(raw.groq_model_id, "GROQ_MODEL_ID")?;

        let max_tokens = u32::try_from(raw.max_tokens)
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| ConfigurationError::OutOfRange {
                name: "MAX_TOKENS",
                value: raw.max_tokens.to_string(),
            })?;

        if !(0.0..=2.0).contains(&raw.temperature) {
            return Err(ConfigurationError::OutOfRange {
                name: "TEMPERATURE",
                value: raw.temperature.to_string(),
            });
        }

        if !(0.0..=1.0).contains(&raw.top_p) {
            return Err(ConfigurationError::OutOfRange {
                name: "TOP_P",
                value: raw.top_p.to_string(),
            });
        }

        Ok(Self {
            api_key,
            base_url: raw.groq_base_url,
            generation: GenerationParameters {
                model,
                max_tokens,
                temperature: raw.temperature,
                top_p: raw.top_p,
            },
            host: raw.host,
            port: raw.port,
        })
    }
}
