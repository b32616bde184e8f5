//! Application-wide error types.

use thiserror::Error;

use crate::llm::ProviderError;
use crate::tools::ToolError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("llm error: {0}")]
    Llm(#[from] ProviderError),

    #[error("tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("chain error: {0}")]
    Chain(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn config_error_display() {
        let e = AppError::Config("missing field".into());
        assert!(e.to_string().contains("missing field"));
    }

    #[test]
    fn chain_error_display() {
        let e = AppError::Chain("orchestrator output: no JSON".into());
        assert!(e.to_string().contains("no JSON"));
    }

    #[test]
    fn provider_error_converts() {
        let p = ProviderError::Request("HTTP 500".into());
        let e: AppError = p.into();
        assert!(e.to_string().contains("llm error"));
        assert!(e.to_string().contains("HTTP 500"));
    }

    #[test]
    fn tool_error_converts() {
        let t = ToolError::MissingKey("WEATHER_API_KEY");
        let e: AppError = t.into();
        assert!(e.to_string().contains("WEATHER_API_KEY"));
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let e: AppError = io_err.into();
        assert!(e.to_string().contains("io error"));
        // satisfies std::error::Error trait
        let _: &dyn Error = &e;
    }
}
