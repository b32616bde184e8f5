//! External data-fetch tools.
//!
//! Each tool is a stateless adapter over one third-party HTTP API and
//! returns its result as an **opaque string** (pretty-printed JSON). The
//! chain interpolates these strings into the summarizer prompt verbatim and
//! relies on no internal structure.
//!
//! No retries, no caching — a failed lookup is a typed error propagated to
//! the hosting loop.

pub mod weather;
pub mod web_search;

use thiserror::Error;

use crate::config::ToolsConfig;

pub use weather::WeatherTool;
pub use web_search::WebSearchTool;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("missing API key: set {0} in the environment")]
    MissingKey(&'static str),
    #[error("tool request failed: {0}")]
    Request(String),
    #[error("malformed tool response: {0}")]
    Malformed(String),
}

/// The lookups available to a chain, built once at startup.
#[derive(Debug, Clone)]
pub struct Toolbox {
    pub web_search: WebSearchTool,
    pub weather: WeatherTool,
}

impl Toolbox {
    /// `weather_api_key` comes from `WEATHER_API_KEY` env — never TOML.
    pub fn from_config(
        config: &ToolsConfig,
        weather_api_key: Option<String>,
    ) -> Result<Self, ToolError> {
        Ok(Self {
            web_search: WebSearchTool::new(
                config.web_search.api_base_url.clone(),
                config.web_search.max_results,
            )?,
            weather: WeatherTool::new(config.weather.api_base_url.clone(), weather_api_key)?,
        })
    }
}
