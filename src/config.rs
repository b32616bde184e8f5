//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory,
//! then applies `NELUM_LOG_LEVEL` and `NELUM_CHAIN_MODE` env overrides.
//! API keys (`LLM_API_KEY`, `WEATHER_API_KEY`) come from the environment
//! only — never from TOML.

use std::{
    env, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::Deserialize;

use crate::error::AppError;

/// Which response pipeline handles a user turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainMode {
    /// One boolean-gated web lookup + one boolean-gated weather lookup.
    Single,
    /// Lists of web sub-queries and weather locations, fetched sequentially.
    Multi,
    /// No orchestration, no lookups — summarizer stream only.
    Simple,
}

impl FromStr for ChainMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(ChainMode::Single),
            "multi" => Ok(ChainMode::Multi),
            "simple" => Ok(ChainMode::Simple),
            other => Err(AppError::Config(format!("unknown chain mode: '{other}'"))),
        }
    }
}

/// Chain pipeline configuration (from `[chain]`).
#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub mode: ChainMode,
    /// Whether to record and log time-to-first-chunk per turn.
    pub track_metrics: bool,
    /// Most recent transcript turns interpolated into prompts.
    pub history_turns: usize,
    /// Directory holding prompt template overrides.
    pub prompts_dir: PathBuf,
}

/// OpenAI / OpenAI-compatible provider configuration.
/// Populated from `[llm.openai]` in the TOML.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Full chat completions endpoint URL.
    pub api_base_url: String,
    /// Model used for the orchestrator (structured-output decision) step.
    pub orchestrator_model: String,
    /// Model used for the summarizer (streaming generation) step.
    pub summarizer_model: String,
    /// Sampling temperature (ignored for models that forbid it).
    pub temperature: f32,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
}

/// LLM subsystem configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Which provider is active (e.g. `"dummy"`, `"openai"`).
    /// Maps to `default` in `[llm]` TOML — named `default` there to signal
    /// that other provider sections can coexist without being loaded.
    pub provider: String,
    /// Config for the OpenAI / OpenAI-compatible provider (`[llm.openai]`).
    pub openai: OpenAiConfig,
}

/// Web-search tool configuration (from `[tools.web_search]`).
#[derive(Debug, Clone)]
pub struct WebSearchConfig {
    pub api_base_url: String,
    /// Upper bound on results per lookup; orchestrator counts are clamped to it.
    pub max_results: u32,
}

/// Weather tool configuration (from `[tools.weather]`).
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub api_base_url: String,
}

/// Tools configuration.
#[derive(Debug, Clone)]
pub struct ToolsConfig {
    pub web_search: WebSearchConfig,
    pub weather: WeatherConfig,
}

/// Fully-resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_name: String,
    pub log_level: String,
    pub chain: ChainConfig,
    pub llm: LlmConfig,
    pub tools: ToolsConfig,
    /// API key from `LLM_API_KEY` env var — `None` for keyless local models.
    /// Never sourced from TOML.
    pub llm_api_key: Option<String>,
    /// API key from `WEATHER_API_KEY` env var. Never sourced from TOML.
    pub weather_api_key: Option<String>,
}

// ── Raw TOML shapes ───────────────────────────────────────────────────────────

/// Raw TOML shape — `serde` target before resolution.
#[derive(Deserialize)]
struct RawConfig {
    bot: RawBot,
    #[serde(default)]
    chain: RawChain,
    #[serde(default)]
    llm: RawLlm,
    #[serde(default)]
    tools: RawTools,
}

#[derive(Deserialize)]
struct RawBot {
    name: String,
    #[serde(default = "default_log_level")]
    log_level: String,
}

#[derive(Deserialize)]
struct RawChain {
    #[serde(default = "default_chain_mode")]
    mode: String,
    #[serde(default = "default_true")]
    track_metrics: bool,
    #[serde(default = "default_history_turns")]
    history_turns: usize,
    #[serde(default = "default_prompts_dir")]
    prompts_dir: String,
}

impl Default for RawChain {
    fn default() -> Self {
        Self {
            mode: default_chain_mode(),
            track_metrics: true,
            history_turns: default_history_turns(),
            prompts_dir: default_prompts_dir(),
        }
    }
}

#[derive(Deserialize)]
struct RawLlm {
    /// Maps to `default = "..."` in `[llm]`.
    #[serde(rename = "default", default = "default_llm_provider")]
    provider: String,
    #[serde(default)]
    openai: RawOpenAi,
}

impl Default for RawLlm {
    fn default() -> Self {
        Self { provider: default_llm_provider(), openai: RawOpenAi::default() }
    }
}

#[derive(Deserialize)]
struct RawOpenAi {
    #[serde(default = "default_api_base_url")]
    api_base_url: String,
    #[serde(default = "default_orchestrator_model")]
    orchestrator_model: String,
    #[serde(default = "default_summarizer_model")]
    summarizer_model: String,
    #[serde(default = "default_temperature")]
    temperature: f32,
    #[serde(default = "default_timeout_seconds")]
    timeout_seconds: u64,
}

impl Default for RawOpenAi {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            orchestrator_model: default_orchestrator_model(),
            summarizer_model: default_summarizer_model(),
            temperature: default_temperature(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

#[derive(Deserialize, Default)]
struct RawTools {
    #[serde(default)]
    web_search: RawWebSearch,
    #[serde(default)]
    weather: RawWeather,
}

#[derive(Deserialize)]
struct RawWebSearch {
    #[serde(default = "default_web_search_url")]
    api_base_url: String,
    #[serde(default = "default_max_results")]
    max_results: u32,
}

impl Default for RawWebSearch {
    fn default() -> Self {
        Self { api_base_url: default_web_search_url(), max_results: default_max_results() }
    }
}

#[derive(Deserialize)]
struct RawWeather {
    #[serde(default = "default_weather_url")]
    api_base_url: String,
}

impl Default for RawWeather {
    fn default() -> Self {
        Self { api_base_url: default_weather_url() }
    }
}

// ── Defaults ──────────────────────────────────────────────────────────────────

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_chain_mode() -> String {
    "single".to_string()
}

fn default_history_turns() -> usize {
    20
}

fn default_prompts_dir() -> String {
    "config/prompts".to_string()
}

fn default_llm_provider() -> String {
    "dummy".to_string()
}

fn default_api_base_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_orchestrator_model() -> String {
    "gpt-4o".to_string()
}

fn default_summarizer_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_web_search_url() -> String {
    "https://api.duckduckgo.com/".to_string()
}

fn default_max_results() -> u32 {
    10
}

fn default_weather_url() -> String {
    "https://api.weatherapi.com/v1/current.json".to_string()
}

// ── Loading ───────────────────────────────────────────────────────────────────

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Load config from the default path with env overrides applied.
pub fn load() -> Result<Config, AppError> {
    load_from(
        Path::new(DEFAULT_CONFIG_PATH),
        env::var("NELUM_LOG_LEVEL").ok().as_deref(),
        env::var("NELUM_CHAIN_MODE").ok().as_deref(),
    )
}

/// Load config from `path`, with overrides injected for testability.
fn load_from(
    path: &Path,
    log_level_override: Option<&str>,
    chain_mode_override: Option<&str>,
) -> Result<Config, AppError> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
    let parsed: RawConfig = toml::from_str(&text)
        .map_err(|e| AppError::Config(format!("malformed {}: {e}", path.display())))?;

    let log_level = log_level_override
        .map(str::to_string)
        .unwrap_or(parsed.bot.log_level);
    let mode = chain_mode_override
        .unwrap_or(&parsed.chain.mode)
        .parse::<ChainMode>()?;

    Ok(Config {
        bot_name: parsed.bot.name,
        log_level,
        chain: ChainConfig {
            mode,
            track_metrics: parsed.chain.track_metrics,
            history_turns: parsed.chain.history_turns,
            prompts_dir: PathBuf::from(parsed.chain.prompts_dir),
        },
        llm: LlmConfig {
            provider: parsed.llm.provider,
            openai: OpenAiConfig {
                api_base_url: parsed.llm.openai.api_base_url,
                orchestrator_model: parsed.llm.openai.orchestrator_model,
                summarizer_model: parsed.llm.openai.summarizer_model,
                temperature: parsed.llm.openai.temperature,
                timeout_seconds: parsed.llm.openai.timeout_seconds,
            },
        },
        tools: ToolsConfig {
            web_search: WebSearchConfig {
                api_base_url: parsed.tools.web_search.api_base_url,
                max_results: parsed.tools.web_search.max_results,
            },
            weather: WeatherConfig {
                api_base_url: parsed.tools.weather.api_base_url,
            },
        },
        llm_api_key: env::var("LLM_API_KEY").ok(),
        weather_api_key: env::var("WEATHER_API_KEY").ok(),
    })
}

// ── test helpers ──────────────────────────────────────────────────────────────

/// Safe `Config` for unit tests — dummy LLM, no API keys, no external calls.
#[cfg(test)]
impl Config {
    pub fn test_default() -> Self {
        Self {
            bot_name: "test".into(),
            log_level: "info".into(),
            chain: ChainConfig {
                mode: ChainMode::Single,
                track_metrics: false,
                history_turns: 20,
                prompts_dir: PathBuf::from("config/prompts"),
            },
            llm: LlmConfig {
                provider: "dummy".into(),
                openai: OpenAiConfig {
                    api_base_url: "http://localhost:0/v1/chat/completions".into(),
                    orchestrator_model: "test-model".into(),
                    summarizer_model: "test-model".into(),
                    temperature: 0.0,
                    timeout_seconds: 1,
                },
            },
            tools: ToolsConfig {
                web_search: WebSearchConfig {
                    api_base_url: "http://localhost:0/".into(),
                    max_results: 10,
                },
                weather: WeatherConfig {
                    api_base_url: "http://localhost:0/current.json".into(),
                },
            },
            llm_api_key: None,
            weather_api_key: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL_TOML: &str = r#"
[bot]
name = "test-bot"
"#;

    fn write_toml(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn parse_minimal_config_applies_defaults() {
        let f = write_toml(MINIMAL_TOML);
        let cfg = load_from(f.path(), None, None).unwrap();
        assert_eq!(cfg.bot_name, "test-bot");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.chain.mode, ChainMode::Single);
        assert!(cfg.chain.track_metrics);
        assert_eq!(cfg.llm.provider, "dummy");
        assert_eq!(cfg.tools.web_search.max_results, 10);
    }

    #[test]
    fn parse_full_config() {
        let f = write_toml(
            r#"
[bot]
name = "nelum"
log_level = "debug"

[chain]
mode = "multi"
track_metrics = false
history_turns = 5

[llm]
default = "openai"

[llm.openai]
api_base_url = "http://localhost:8080/v1/chat/completions"
orchestrator_model = "big"
summarizer_model = "small"
temperature = 0.7
timeout_seconds = 30

[tools.web_search]
max_results = 4
"#,
        );
        let cfg = load_from(f.path(), None, None).unwrap();
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.chain.mode, ChainMode::Multi);
        assert!(!cfg.chain.track_metrics);
        assert_eq!(cfg.chain.history_turns, 5);
        assert_eq!(cfg.llm.provider, "openai");
        assert_eq!(cfg.llm.openai.orchestrator_model, "big");
        assert_eq!(cfg.llm.openai.summarizer_model, "small");
        assert_eq!(cfg.tools.web_search.max_results, 4);
    }

    #[test]
    fn log_level_override_wins() {
        let f = write_toml(MINIMAL_TOML);
        let cfg = load_from(f.path(), Some("trace"), None).unwrap();
        assert_eq!(cfg.log_level, "trace");
    }

    #[test]
    fn chain_mode_override_wins() {
        let f = write_toml(MINIMAL_TOML);
        let cfg = load_from(f.path(), None, Some("simple")).unwrap();
        assert_eq!(cfg.chain.mode, ChainMode::Simple);
    }

    #[test]
    fn unknown_chain_mode_errors() {
        let f = write_toml(MINIMAL_TOML);
        let result = load_from(f.path(), None, Some("parallel"));
        assert!(result.unwrap_err().to_string().contains("unknown chain mode"));
    }

    #[test]
    fn missing_file_errors() {
        let result = load_from(Path::new("/nonexistent/config.toml"), None, None);
        assert!(result.unwrap_err().to_string().contains("config error"));
    }

    #[test]
    fn mode_from_str_roundtrip() {
        assert_eq!("single".parse::<ChainMode>().unwrap(), ChainMode::Single);
        assert_eq!("multi".parse::<ChainMode>().unwrap(), ChainMode::Multi);
        assert_eq!("simple".parse::<ChainMode>().unwrap(), ChainMode::Simple);
        assert!("".parse::<ChainMode>().is_err());
    }
}
