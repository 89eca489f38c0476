//! Video search tool that scrapes the YouTube results page.
//!
//! YouTube has no key-free search API; like its inspiration this tool fetches
//! the HTML results page and pulls distinct video ids out of the embedded
//! player data.

use async_trait::async_trait;
use regex::Regex;

use crate::error::ToolError;

use super::Tool;

const RESULTS_URL: &str = "https://www.youtube.com/results?search_query=";
const MAX_VIDEOS: usize = 5;

/// Search for videos on YouTube.
#[derive(Debug)]
pub struct YouTubeSearch {
    client: reqwest::Client,
    video_id: Regex,
}

impl YouTubeSearch {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (compatible; magus/0.1)")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            client,
            video_id: Regex::new(r#""videoId":"([A-Za-z0-9_-]{11})""#)
                .expect("video id pattern is valid"),
        }
    }
}

impl Default for YouTubeSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for YouTubeSearch {
    fn name(&self) -> &str {
        "YouTubeSearch"
    }

    fn description(&self) -> &str {
        "Useful for when you need to search for videos on YouTube. Input should be a search query."
    }

    async fn invoke(&self, query: &str) -> Result<String, ToolError> {
        let url = format!("{}{}", RESULTS_URL, urlencoding::encode(query));

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ToolError::execution)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::Execution(format!(
                "youtube request failed with HTTP {}",
                status
            )));
        }

        let html = response.text().await.map_err(ToolError::execution)?;
        Ok(render_watch_urls(
            extract_video_ids(&self.video_id, &html, MAX_VIDEOS),
            query,
        ))
    }
}

/// Pull distinct video ids out of the results page, preserving page order.
fn extract_video_ids(pattern: &Regex, html: &str, max: usize) -> Vec<String> {
    let mut ids = Vec::new();
    for capture in pattern.captures_iter(html) {
        let id = capture[1].to_string();
        if !ids.contains(&id) {
            ids.push(id);
        }
        if ids.len() == max {
            break;
        }
    }
    ids
}

fn render_watch_urls(ids: Vec<String>, query: &str) -> String {
    if ids.is_empty() {
        format!("No videos found for: {}", query)
    } else {
        ids.iter()
            .map(|id| format!("https://www.youtube.com/watch?v={}", id))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern() -> Regex {
        Regex::new(r#""videoId":"([A-Za-z0-9_-]{11})""#).expect("pattern")
    }

    #[test]
    fn extracts_distinct_ids_in_page_order() {
        let html = r#"
            {"videoId":"aaaaaaaaaaa","thumbnail":{}}
            {"videoId":"bbbbbbbbbbb"}
            {"videoId":"aaaaaaaaaaa"}
            {"videoId":"ccccccccccc"}
        "#;
        let ids = extract_video_ids(&pattern(), html, 5);
        assert_eq!(ids, vec!["aaaaaaaaaaa", "bbbbbbbbbbb", "ccccccccccc"]);
    }

    #[test]
    fn stops_at_the_requested_maximum() {
        let html = r#"{"videoId":"aaaaaaaaaaa"}{"videoId":"bbbbbbbbbbb"}{"videoId":"ccccccccccc"}"#;
        let ids = extract_video_ids(&pattern(), html, 2);
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn renders_watch_urls_or_a_miss_message() {
        let urls = render_watch_urls(vec!["dQw4w9WgXcQ".to_string()], "q");
        assert_eq!(urls, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");

        assert_eq!(render_watch_urls(vec![], "lofi"), "No videos found for: lofi");
    }
}
