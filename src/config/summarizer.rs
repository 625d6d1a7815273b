use std::env;
use std::fmt;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unknown summarizer provider: {0}")]
    UnknownProvider(String),
    #[error("{0} must be set")]
    MissingApiKey(&'static str),
}

/// Which text-generation backend produces meeting summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarizerProvider {
    OpenAi,
    Gemini,
}

impl SummarizerProvider {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.to_ascii_lowercase().as_str() {
            "openai" => Ok(SummarizerProvider::OpenAi),
            "gemini" => Ok(SummarizerProvider::Gemini),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }

    fn api_key_var(&self) -> &'static str {
        match self {
            SummarizerProvider::OpenAi => "OPENAI_API_KEY",
            SummarizerProvider::Gemini => "GEMINI_API_KEY",
        }
    }

    fn default_model(&self) -> &'static str {
        match self {
            SummarizerProvider::OpenAi => "gpt-4o",
            SummarizerProvider::Gemini => "gemini-1.5-pro",
        }
    }
}

impl fmt::Display for SummarizerProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummarizerProvider::OpenAi => write!(f, "openai"),
            SummarizerProvider::Gemini => write!(f, "gemini"),
        }
    }
}

/// Resolved once at startup and injected into the summarizer, so the
/// provider choice is an explicit value rather than process-wide state.
#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    pub provider: SummarizerProvider,
    pub model: String,
    pub api_key: String,
}

impl SummarizerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let provider = match env::var("SUMMARIZER_PROVIDER") {
            Ok(value) => SummarizerProvider::parse(&value)?,
            Err(_) => SummarizerProvider::OpenAi,
        };

        let api_key = env::var(provider.api_key_var())
            .map_err(|_| ConfigError::MissingApiKey(provider.api_key_var()))?;

        let model =
            env::var("SUMMARIZER_MODEL").unwrap_or_else(|_| provider.default_model().to_string());

        Ok(Self {
            provider,
            model,
            api_key,
        })
    }
}
