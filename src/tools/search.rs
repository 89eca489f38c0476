//! Web search tool backed by the Serper.dev Google Search API.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::error::ToolError;

use super::Tool;

const SERPER_ENDPOINT: &str = "https://google.serper.dev/search";

/// Locale and result-count settings for web search.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    /// Country code passed as `gl` (e.g. "br").
    pub country: String,
    /// Interface language passed as `hl` (e.g. "pt-br").
    pub language: String,
    /// Maximum number of organic results to render.
    pub max_results: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            country: "br".to_string(),
            language: "pt-br".to_string(),
            max_results: 5,
        }
    }
}

/// Search the web for general and up-to-date information.
#[derive(Debug)]
pub struct WebSearch {
    client: reqwest::Client,
    api_key: String,
    settings: SearchSettings,
}

impl WebSearch {
    pub fn new(api_key: String) -> Self {
        Self::with_settings(api_key, SearchSettings::default())
    }

    pub fn with_settings(api_key: String, settings: SearchSettings) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("magus/0.1")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key,
            settings,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    answer_box: Option<AnswerBox>,
    #[serde(default)]
    organic: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct AnswerBox {
    answer: Option<String>,
    snippet: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    title: String,
    #[serde(default)]
    snippet: String,
    link: String,
}

#[async_trait]
impl Tool for WebSearch {
    fn name(&self) -> &str {
        "Search"
    }

    fn description(&self) -> &str {
        "Useful for when you need to search the web for general data and up to date information."
    }

    async fn invoke(&self, query: &str) -> Result<String, ToolError> {
        let body = json!({
            "q": query,
            "gl": self.settings.country,
            "hl": self.settings.language,
            "num": self.settings.max_results,
        });

        let response = self
            .client
            .post(SERPER_ENDPOINT)
            .header("X-API-KEY", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(ToolError::execution)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::Execution(format!(
                "search request failed with HTTP {}",
                status
            )));
        }

        let parsed: SearchResponse = response.json().await.map_err(ToolError::execution)?;
        Ok(render_results(&parsed, query, self.settings.max_results))
    }
}

fn render_results(response: &SearchResponse, query: &str, max_results: usize) -> String {
    let mut sections = Vec::new();

    if let Some(answer_box) = &response.answer_box {
        if let Some(text) = answer_box.answer.as_ref().or(answer_box.snippet.as_ref()) {
            sections.push(format!("Answer: {}", text));
        }
    }

    for result in response.organic.iter().take(max_results) {
        sections.push(format!(
            "{}\n{}\nURL: {}",
            result.title, result.snippet, result.link
        ));
    }

    if sections.is_empty() {
        format!("No results found for: {}", query)
    } else {
        sections.join("\n\n")
    }
}
