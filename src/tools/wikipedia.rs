//! Encyclopedia lookup tool backed by the MediaWiki API.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

use crate::error::ToolError;

use super::Tool;

const WIKIPEDIA_ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";
const MAX_PAGES: usize = 3;
const MAX_EXTRACT_CHARS: usize = 2000;

/// Look up people, places, companies, facts and historical events.
#[derive(Debug)]
pub struct Wikipedia {
    client: reqwest::Client,
}

impl Wikipedia {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent("magus/0.1")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self { client }
    }
}

impl Default for Wikipedia {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    query: Option<QueryBody>,
}

#[derive(Debug, Deserialize)]
struct QueryBody {
    #[serde(default)]
    pages: HashMap<String, Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    title: String,
    extract: Option<String>,
    // Search rank; pages arrive keyed by page id, not in result order.
    index: Option<i64>,
}

#[async_trait]
impl Tool for Wikipedia {
    fn name(&self) -> &str {
        "Wikipedia"
    }

    fn description(&self) -> &str {
        "Useful for when you need to answer general questions about people, places, companies, \
         facts, historical events, or other subjects. Input should be a search query."
    }

    async fn invoke(&self, query: &str) -> Result<String, ToolError> {
        // One round trip: search pages and pull plain-text intro extracts.
        let response = self
            .client
            .get(WIKIPEDIA_ENDPOINT)
            .query(&[
                ("action", "query"),
                ("generator", "search"),
                ("gsrsearch", query),
                ("gsrlimit", "3"),
                ("prop", "extracts"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(ToolError::execution)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::Execution(format!(
                "wikipedia request failed with HTTP {}",
                status
            )));
        }

        let parsed: QueryResponse = response.json().await.map_err(ToolError::execution)?;
        Ok(render_pages(parsed, query))
    }
}

fn render_pages(response: QueryResponse, query: &str) -> String {
    let mut pages: Vec<Page> = response
        .query
        .map(|q| q.pages.into_values().collect())
        .unwrap_or_default();
    pages.sort_by_key(|p| p.index.unwrap_or(i64::MAX));

    let sections: Vec<String> = pages
        .into_iter()
        .take(MAX_PAGES)
        .filter_map(|page| {
            let extract = page.extract?;
            let summary = if extract.len() > MAX_EXTRACT_CHARS {
                let mut end = MAX_EXTRACT_CHARS;
                while !extract.is_char_boundary(end) {
                    end -= 1;
                }
                format!("{}...", &extract[..end])
            } else {
                extract
            };
            Some(format!("Page: {}\nSummary: {}", page.title, summary))
        })
        .collect();

    if sections.is_empty() {
        format!("No Wikipedia pages found for: {}", query)
    } else {
        sections.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(value: serde_json::Value) -> QueryResponse {
        serde_json::from_value(value).expect("parse")
    }

    #[test]
    fn renders_pages_in_search_rank_order() {
        let parsed = response(serde_json::json!({
            "query": {
                "pages": {
                    "42": { "title": "Second", "extract": "b", "index": 2 },
                    "7": { "title": "First", "extract": "a", "index": 1 }
                }
            }
        }));

        let text = render_pages(parsed, "q");
        let first = text.find("Page: First").expect("first page present");
        let second = text.find("Page: Second").expect("second page present");
        assert!(first < second);
    }

    #[test]
    fn reports_when_no_pages_match() {
        let parsed = response(serde_json::json!({}));
        assert_eq!(
            render_pages(parsed, "xyzzy"),
            "No Wikipedia pages found for: xyzzy"
        );
    }

    #[test]
    fn long_extracts_are_truncated_on_char_boundaries() {
        let long = "é".repeat(MAX_EXTRACT_CHARS);
        let parsed = response(serde_json::json!({
            "query": {
                "pages": {
                    "1": { "title": "Long", "extract": long, "index": 1 }
                }
            }
        }));

        let text = render_pages(parsed, "q");
        assert!(text.ends_with("..."));
    }
}
