//! Text-generation providers.
//!
//! The reasoning loop only needs one capability: text in, text out. Each
//! hosted provider implements [`Generator`]; the shell picks one before
//! constructing the agent, keeping the loop provider-agnostic.

mod gemini;
mod openai;

pub use gemini::GeminiClient;
pub use openai::OpenAiClient;

use async_trait::async_trait;

use crate::error::ProviderError;

/// Single-shot text generation. The provider keeps no loop state; the agent
/// reconstructs context in every prompt.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Provider name, used in logs and error strings.
    fn name(&self) -> &str;

    /// Generate a completion for the prompt.
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent("magus/0.1")
        .timeout(std::time::Duration::from_secs(120))
        .build()
        .unwrap_or_default()
}
