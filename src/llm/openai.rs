//! OpenAI-compatible chat completions client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

use super::Generator;

const PROVIDER: &str = "openai";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_MAX_TOKENS: u32 = 600;

/// Client for the OpenAI chat completions API (and compatible endpoints).
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl OpenAiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: super::http_client(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Override the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point at an OpenAI-compatible endpoint (proxies, local servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[async_trait]
impl Generator for OpenAiClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|source| ProviderError::Http {
                provider: PROVIDER,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                provider: PROVIDER,
                status,
                body,
            });
        }

        let parsed: ChatResponse =
            response
                .json()
                .await
                .map_err(|source| ProviderError::Http {
                    provider: PROVIDER,
                    source,
                })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(ProviderError::EmptyResponse { provider: PROVIDER })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_to_chat_completions_shape() {
        let request = ChatRequest {
            model: "gpt-4o-mini",
            messages: vec![ChatMessage {
                role: "user",
                content: "hello",
            }],
            max_tokens: 600,
        };

        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value["model"], "gpt-4o-mini");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["max_tokens"], 600);
    }

    #[test]
    fn response_with_no_content_is_detected() {
        let parsed: ChatResponse = serde_json::from_value(serde_json::json!({
            "choices": [{ "message": { "content": null } }]
        }))
        .expect("parse");

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content);
        assert!(content.is_none());
    }
}
