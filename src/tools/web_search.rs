//! Web search via the DuckDuckGo Instant Answer API.
//!
//! The answer payload mixes an abstract with nested `RelatedTopics` groups;
//! [`flatten_results`] walks both into a flat `{title, url, snippet}` list
//! truncated to the requested count. Callers get the list back
//! pretty-printed as one opaque JSON string.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ToolError;

/// Hard bound on results per lookup, matching what the endpoint usefully
/// returns. Config may lower it, never raise it.
const MAX_RESULTS: u32 = 10;

#[derive(Debug, Clone)]
pub struct WebSearchTool {
    client: Client,
    api_base_url: String,
    max_results: u32,
}

impl WebSearchTool {
    pub fn new(api_base_url: String, max_results: u32) -> Result<Self, ToolError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ToolError::Request(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, api_base_url, max_results: max_results.min(MAX_RESULTS) })
    }

    /// Fetch up to `count` results for `query` (strict safesearch).
    ///
    /// `count` is whatever the orchestrator produced — it is clamped to the
    /// supported range here rather than trusted.
    pub async fn search(&self, query: &str, count: u32) -> Result<String, ToolError> {
        let count = clamp_count(count, self.max_results);
        debug!(%query, count, "web search");

        let response = self
            .client
            .get(&self.api_base_url)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
                ("kp", "1"),
            ])
            .send()
            .await
            .map_err(|e| ToolError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ToolError::Request(format!("HTTP {status}: {body}")));
        }

        let answer = response
            .json::<InstantAnswer>()
            .await
            .map_err(|e| ToolError::Malformed(e.to_string()))?;

        let results = flatten_results(&answer, count);
        debug!(returned = results.len(), "web search results");

        serde_json::to_string_pretty(&results).map_err(|e| ToolError::Malformed(e.to_string()))
    }
}

/// Clamp an orchestrator-supplied count into `1..=max`.
fn clamp_count(count: u32, max: u32) -> usize {
    count.clamp(1, max.max(1)) as usize
}

// ── Wire types ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct InstantAnswer {
    #[serde(rename = "Heading", default)]
    heading: String,
    #[serde(rename = "AbstractText", default)]
    abstract_text: String,
    #[serde(rename = "AbstractURL", default)]
    abstract_url: String,
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<RelatedTopic>,
}

/// `RelatedTopics` entries are either direct results or named groups of
/// results; `serde(untagged)` tries `Entry` first (requires `Text`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RelatedTopic {
    Entry {
        #[serde(rename = "Text")]
        text: String,
        #[serde(rename = "FirstURL", default)]
        first_url: String,
    },
    Group {
        #[serde(rename = "Topics", default)]
        topics: Vec<RelatedTopic>,
    },
}

#[derive(Debug, Serialize, PartialEq)]
struct SearchResult {
    title: String,
    url: String,
    snippet: String,
}

fn flatten_results(answer: &InstantAnswer, count: usize) -> Vec<SearchResult> {
    let mut out = Vec::new();

    if !answer.abstract_text.is_empty() {
        out.push(SearchResult {
            title: answer.heading.clone(),
            url: answer.abstract_url.clone(),
            snippet: answer.abstract_text.clone(),
        });
    }

    collect_topics(&answer.related_topics, count, &mut out);
    out.truncate(count);
    out
}

fn collect_topics(topics: &[RelatedTopic], count: usize, out: &mut Vec<SearchResult>) {
    for topic in topics {
        if out.len() >= count {
            return;
        }
        match topic {
            RelatedTopic::Entry { text, first_url } => {
                // `Text` reads "Title - description"; keep the leading
                // segment as the title and the whole line as the snippet.
                let title = text.split_once(" - ").map_or(text.as_str(), |(t, _)| t);
                out.push(SearchResult {
                    title: title.to_string(),
                    url: first_url.clone(),
                    snippet: text.clone(),
                });
            }
            RelatedTopic::Group { topics } => collect_topics(topics, count, out),
        }
    }
}
