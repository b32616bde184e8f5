//! Current weather via the WeatherAPI `current.json` endpoint.
//!
//! The response body is passed through pretty-printed rather than modeled:
//! the summarizer consumes it as text and field selection is the model's
//! job, not ours.

use reqwest::Client;
use tracing::debug;

use super::ToolError;

#[derive(Debug, Clone)]
pub struct WeatherTool {
    client: Client,
    api_base_url: String,
    api_key: Option<String>,
}

impl WeatherTool {
    /// `api_key` comes from `WEATHER_API_KEY` env. A tool without a key can
    /// be constructed (the chain may never route to it) but fails on use.
    pub fn new(api_base_url: String, api_key: Option<String>) -> Result<Self, ToolError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ToolError::Request(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, api_base_url, api_key })
    }

    /// Fetch current conditions for `location` (free-form, resolved by the API).
    pub async fn current(&self, location: &str) -> Result<String, ToolError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(ToolError::MissingKey("WEATHER_API_KEY"))?;

        debug!(%location, "weather lookup");

        let response = self
            .client
            .get(&self.api_base_url)
            .query(&[("key", key), ("q", location)])
            .send()
            .await
            .map_err(|e| ToolError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ToolError::Request(format!("HTTP {status}: {body}")));
        }

        let body = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| ToolError::Malformed(e.to_string()))?;

        serde_json::to_string_pretty(&body).map_err(|e| ToolError::Malformed(e.to_string()))
    }
}
