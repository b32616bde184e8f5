//! Tests for chain prompt templates under config/prompts

use std::fs;
use std::path::{Path, PathBuf};

fn prompts_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("config/prompts")
}

fn prompt_path(name: &str) -> PathBuf {
    prompts_dir().join(name)
}

#[test]
fn test_orchestrator_prompt_file_exists() {
    assert!(prompt_path("orchestrator.md").exists(), "orchestrator.md prompt file missing");
}

#[test]
fn test_multi_orchestrator_prompt_file_exists() {
    assert!(
        prompt_path("multi_orchestrator.md").exists(),
        "multi_orchestrator.md prompt file missing"
    );
}

#[test]
fn test_summarizer_prompt_file_exists() {
    assert!(prompt_path("summarizer.md").exists(), "summarizer.md prompt file missing");
}

#[test]
fn test_orchestrator_template_vars() {
    let text = fs::read_to_string(prompt_path("orchestrator.md")).unwrap();
    assert!(text.contains("{{user_query}}"), "orchestrator.md should contain {{user_query}} variable");
    assert!(text.contains("{{chat_history}}"), "orchestrator.md should contain {{chat_history}} variable");
}

#[test]
fn test_orchestrator_names_every_task_field() {
    let text = fs::read_to_string(prompt_path("orchestrator.md")).unwrap();
    for field in [
        "should_search_web",
        "should_search_weather",
        "web_query",
        "web_query_count",
        "weather_query",
    ] {
        assert!(text.contains(field), "orchestrator.md should describe the '{field}' field");
    }
}

#[test]
fn test_multi_orchestrator_template_vars() {
    let text = fs::read_to_string(prompt_path("multi_orchestrator.md")).unwrap();
    assert!(text.contains("{{user_query}}"), "multi_orchestrator.md should contain {{user_query}} variable");
    assert!(text.contains("{{chat_history}}"), "multi_orchestrator.md should contain {{chat_history}} variable");
    assert!(text.contains("web_tasks"), "multi_orchestrator.md should describe the 'web_tasks' field");
    assert!(text.contains("weather_tasks"), "multi_orchestrator.md should describe the 'weather_tasks' field");
}

#[test]
fn test_summarizer_template_vars() {
    let text = fs::read_to_string(prompt_path("summarizer.md")).unwrap();
    assert!(text.contains("{{user_query}}"), "summarizer.md should contain {{user_query}} variable");
    assert!(text.contains("{{chat_history}}"), "summarizer.md should contain {{chat_history}} variable");
    assert!(text.contains("{{web_results}}"), "summarizer.md should contain {{web_results}} variable");
    assert!(text.contains("{{weather_results}}"), "summarizer.md should contain {{weather_results}} variable");
}
