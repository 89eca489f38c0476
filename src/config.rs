//! Configuration management.
//!
//! Configuration can be set via environment variables:
//! - `AGENT_PROVIDER` - Optional. `openai` (default) or `gemini`.
//! - `OPENAI_API_KEY` - Required when the provider is `openai`.
//! - `GEMINI_API_KEY` - Required when the provider is `gemini`.
//! - `SERPER_API_KEY` - Optional. Enables the web search tool.
//! - `AGENT_MODEL` - Optional. Overrides the provider's default model.
//! - `MAX_ITERATIONS` - Optional. Reasoning-loop ceiling. Defaults to `6`.
//! - `SEARCH_COUNTRY` - Optional. Search locale country code. Defaults to `br`.
//! - `SEARCH_LANGUAGE` - Optional. Search locale language. Defaults to `pt-br`.

use thiserror::Error;

use crate::agent::DEFAULT_MAX_ITERATIONS;
use crate::tools::SearchSettings;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Which hosted generation provider to bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Gemini,
}

/// Runtime configuration for the assistant.
#[derive(Debug, Clone)]
pub struct Config {
    /// Generation provider selection
    pub provider: ProviderKind,

    /// API key for the selected provider
    pub api_key: String,

    /// Optional model override (provider default used if not set)
    pub model: Option<String>,

    /// Serper API key; web search is registered only when present
    pub serper_api_key: Option<String>,

    /// Maximum think-act-observe cycles per question
    pub max_iterations: usize,

    /// Locale settings for web search
    pub search: SearchSettings,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if the selected provider's API
    /// key is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let provider = match std::env::var("AGENT_PROVIDER")
            .unwrap_or_else(|_| "openai".to_string())
            .to_lowercase()
            .as_str()
        {
            "openai" => ProviderKind::OpenAi,
            "gemini" => ProviderKind::Gemini,
            other => {
                return Err(ConfigError::InvalidValue(
                    "AGENT_PROVIDER".to_string(),
                    format!("expected `openai` or `gemini`, got: {}", other),
                ))
            }
        };

        let key_var = match provider {
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::Gemini => "GEMINI_API_KEY",
        };
        let api_key = std::env::var(key_var)
            .map_err(|_| ConfigError::MissingEnvVar(key_var.to_string()))?;

        let max_iterations = std::env::var("MAX_ITERATIONS")
            .unwrap_or_else(|_| DEFAULT_MAX_ITERATIONS.to_string())
            .parse()
            .map_err(|e| {
                ConfigError::InvalidValue("MAX_ITERATIONS".to_string(), format!("{}", e))
            })?;

        let mut search = SearchSettings::default();
        if let Ok(country) = std::env::var("SEARCH_COUNTRY") {
            search.country = country;
        }
        if let Ok(language) = std::env::var("SEARCH_LANGUAGE") {
            search.language = language;
        }

        Ok(Self {
            provider,
            api_key,
            model: std::env::var("AGENT_MODEL").ok(),
            serper_api_key: std::env::var("SERPER_API_KEY").ok(),
            max_iterations,
            search,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(provider: ProviderKind, api_key: String) -> Self {
        Self {
            provider,
            api_key,
            model: None,
            serper_api_key: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            search: SearchSettings::default(),
        }
    }
}
