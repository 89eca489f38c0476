//! Google Gemini generateContent client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

use super::Generator;

const PROVIDER: &str = "gemini";
const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Client for the Gemini generateContent API.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: super::http_client(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Override the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[async_trait]
impl Generator for GeminiClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let url = format!("{}/{}:generateContent", BASE_URL, self.model);
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
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

        let parsed: GenerateResponse =
            response
                .json()
                .await
                .map_err(|source| ProviderError::Http {
                    provider: PROVIDER,
                    source,
                })?;

        extract_text(parsed).ok_or(ProviderError::EmptyResponse { provider: PROVIDER })
    }
}

fn extract_text(response: GenerateResponse) -> Option<String> {
    let text = response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .collect::<Vec<_>>()
        .join("");

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
