//! Prompt templates with `{{key}}` substitution.
//!
//! Templates live as plain-text files under `config/prompts/` so they can be
//! edited without recompiling. Each shipped template is also embedded at
//! compile time; a missing or empty file falls back to the embedded copy
//! rather than producing an empty prompt.

use std::fs;
use std::path::Path;

use tracing::debug;

pub const ORCHESTRATOR_FILE: &str = "orchestrator.md";
pub const MULTI_ORCHESTRATOR_FILE: &str = "multi_orchestrator.md";
pub const SUMMARIZER_FILE: &str = "summarizer.md";

const ORCHESTRATOR_EMBEDDED: &str = include_str!("../../config/prompts/orchestrator.md");
const MULTI_ORCHESTRATOR_EMBEDDED: &str = include_str!("../../config/prompts/multi_orchestrator.md");
const SUMMARIZER_EMBEDDED: &str = include_str!("../../config/prompts/summarizer.md");

/// A loaded template; render with [`render`](Self::render).
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Load `filename` from `dir`, falling back to `embedded` when the file
    /// is missing or blank.
    pub fn load(dir: &Path, filename: &str, embedded: &str) -> Self {
        let path = dir.join(filename);
        match fs::read_to_string(&path) {
            Ok(text) if !text.trim().is_empty() => Self::from_text(text),
            _ => {
                debug!("prompt template '{}' not found — using embedded copy", path.display());
                Self::from_text(embedded)
            }
        }
    }

    /// Substitute each `{{key}}` with its value. Unknown placeholders are
    /// left in place; unused vars are ignored.
    pub fn render(&self, vars: &[(&str, &str)]) -> String {
        let mut out = self.text.clone();
        for (key, value) in vars {
            out = out.replace(&format!("{{{{{key}}}}}"), value);
        }
        out
    }
}

/// The three templates a chain needs, loaded together at startup.
#[derive(Debug, Clone)]
pub struct PromptSet {
    pub orchestrator: PromptTemplate,
    pub multi_orchestrator: PromptTemplate,
    pub summarizer: PromptTemplate,
}

impl PromptSet {
    pub fn load(dir: &Path) -> Self {
        Self {
            orchestrator: PromptTemplate::load(dir, ORCHESTRATOR_FILE, ORCHESTRATOR_EMBEDDED),
            multi_orchestrator: PromptTemplate::load(
                dir,
                MULTI_ORCHESTRATOR_FILE,
                MULTI_ORCHESTRATOR_EMBEDDED,
            ),
            summarizer: PromptTemplate::load(dir, SUMMARIZER_FILE, SUMMARIZER_EMBEDDED),
        }
    }

    /// The embedded copies only — what `load` degrades to with no prompt dir.
    pub fn embedded() -> Self {
        Self {
            orchestrator: PromptTemplate::from_text(ORCHESTRATOR_EMBEDDED),
            multi_orchestrator: PromptTemplate::from_text(MULTI_ORCHESTRATOR_EMBEDDED),
            summarizer: PromptTemplate::from_text(SUMMARIZER_EMBEDDED),
        }
    }
}
