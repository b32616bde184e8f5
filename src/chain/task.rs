//! Task classification records produced by the orchestrator step.
//!
//! One record is produced per user turn, consumed immediately, and
//! discarded. The "count/query fields are empty when their flag is false"
//! rule is a prompt-level convention the model is asked to follow — the
//! parser accepts whatever was produced, and the fetch boundary in the
//! chain tolerates inconsistent records.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskParseError {
    #[error("no JSON object in orchestrator reply")]
    NoJson,
    #[error("malformed task JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Single-task decision: one optional web lookup + one optional weather lookup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchTask {
    pub should_search_web: bool,
    pub should_search_weather: bool,
    #[serde(default)]
    pub web_query: String,
    #[serde(default)]
    pub web_query_count: u32,
    #[serde(default)]
    pub weather_query: String,
}

impl SearchTask {
    pub fn parse(raw: &str) -> Result<Self, TaskParseError> {
        from_json_object(raw)
    }
}

/// One web sub-query in a multi-task decision.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WebTask {
    pub query: String,
    #[serde(default)]
    pub query_count: u32,
}

/// One weather location in a multi-task decision.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeatherTask {
    pub location: String,
}

/// Multi-task decision: lists of sub-queries, still fetched sequentially.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MultiSearchTask {
    pub should_search_web: bool,
    pub should_search_weather: bool,
    #[serde(default)]
    pub web_tasks: Vec<WebTask>,
    #[serde(default)]
    pub weather_tasks: Vec<WeatherTask>,
}

impl MultiSearchTask {
    pub fn parse(raw: &str) -> Result<Self, TaskParseError> {
        from_json_object(raw)
    }
}

/// Extract the outermost `{…}` from `raw` and deserialize it.
///
/// Models are instructed to reply with bare JSON but routinely wrap it in
/// Markdown code fences or lead-in prose; slicing from the first `{` to the
/// last `}` strips both.
fn from_json_object<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, TaskParseError> {
    let start = raw.find('{').ok_or(TaskParseError::NoJson)?;
    let end = raw.rfind('}').ok_or(TaskParseError::NoJson)?;
    if end < start {
        return Err(TaskParseError::NoJson);
    }
    Ok(serde_json::from_str(&raw[start..=end])?)
}
