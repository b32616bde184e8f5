//! End-to-end chain tests over scripted providers — no network, no API keys.
//!
//! The orchestrator is a dummy provider replaying a canned decision and the
//! summarizer streams a canned reply; decisions that would trigger a real
//! lookup are limited to the skip paths (empty query / empty task lists) so
//! nothing leaves the process.

use nelum_bot::chain::{SearchChain, TurnInput, prompt::PromptSet};
use nelum_bot::config::{ChainMode, ToolsConfig, WeatherConfig, WebSearchConfig};
use nelum_bot::llm::{LlmProvider, providers::dummy::DummyProvider};
use nelum_bot::tools::Toolbox;

fn scripted(reply: &str) -> LlmProvider {
    LlmProvider::Dummy(DummyProvider::scripted(reply))
}

fn offline_toolbox() -> Toolbox {
    // Unroutable endpoints: any accidental lookup fails loudly.
    let config = ToolsConfig {
        web_search: WebSearchConfig {
            api_base_url: "http://localhost:0/".into(),
            max_results: 10,
        },
        weather: WeatherConfig {
            api_base_url: "http://localhost:0/current.json".into(),
        },
    };
    Toolbox::from_config(&config, None).unwrap()
}

fn chain(orchestrator_reply: &str, summarizer_reply: &str, mode: ChainMode) -> SearchChain {
    SearchChain::new(
        scripted(orchestrator_reply),
        scripted(summarizer_reply),
        offline_toolbox(),
        PromptSet::embedded(),
        mode,
        true,
    )
}

const NO_LOOKUPS: &str = r#"{"should_search_web": false, "should_search_weather": false,
    "web_query": "", "web_query_count": 0, "weather_query": ""}"#;

#[tokio::test]
async fn single_chain_without_lookups_streams_summary() {
    let chain = chain(NO_LOOKUPS, "It is a lovely day.", ChainMode::Single);
    let stream = chain
        .respond(TurnInput { user_query: "hello there", chat_history: "" })
        .await
        .unwrap();
    assert_eq!(stream.collect().await.unwrap(), "It is a lovely day.");
}

#[tokio::test]
async fn single_chain_skips_lookup_with_empty_query() {
    // Flag set but query empty — the inconsistent record the orchestrator
    // is asked (but not guaranteed) to avoid. The lookup must be skipped.
    let decision = r#"{"should_search_web": true, "should_search_weather": true,
        "web_query": "", "web_query_count": 3, "weather_query": "  "}"#;
    let chain = chain(decision, "No sources were needed.", ChainMode::Single);
    let stream = chain
        .respond(TurnInput { user_query: "hm", chat_history: "" })
        .await
        .unwrap();
    assert_eq!(stream.collect().await.unwrap(), "No sources were needed.");
}

#[tokio::test]
async fn single_chain_rejects_malformed_decision() {
    let chain = chain("I could not decide.", "unused", ChainMode::Single);
    let err = chain
        .respond(TurnInput { user_query: "q", chat_history: "" })
        .await
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("orchestrator output"), "unexpected error: {msg}");
}

#[tokio::test]
async fn single_chain_accepts_fenced_decision() {
    let fenced = format!("```json\n{NO_LOOKUPS}\n```");
    let chain = chain(&fenced, "fenced is fine", ChainMode::Single);
    let stream = chain
        .respond(TurnInput { user_query: "q", chat_history: "" })
        .await
        .unwrap();
    assert_eq!(stream.collect().await.unwrap(), "fenced is fine");
}

#[tokio::test]
async fn multi_chain_with_empty_task_lists_streams_summary() {
    let decision = r#"{"should_search_web": false, "should_search_weather": false,
        "web_tasks": [], "weather_tasks": []}"#;
    let chain = chain(decision, "Nothing to fetch.", ChainMode::Multi);
    let stream = chain
        .respond(TurnInput { user_query: "chit-chat", chat_history: "Human: hi" })
        .await
        .unwrap();
    assert_eq!(stream.collect().await.unwrap(), "Nothing to fetch.");
}

#[tokio::test]
async fn multi_chain_skips_blank_subtasks() {
    let decision = r#"{"should_search_web": true, "should_search_weather": false,
        "web_tasks": [{"query": "", "query_count": 3}, {"query": "   ", "query_count": 2}],
        "weather_tasks": []}"#;
    let chain = chain(decision, "All sub-tasks were blank.", ChainMode::Multi);
    let stream = chain
        .respond(TurnInput { user_query: "q", chat_history: "" })
        .await
        .unwrap();
    assert_eq!(stream.collect().await.unwrap(), "All sub-tasks were blank.");
}

#[tokio::test]
async fn simple_chain_never_consults_the_orchestrator() {
    // A malformed orchestrator reply must not matter in simple mode.
    let chain = chain("not json at all", "Direct answer.", ChainMode::Simple);
    let stream = chain
        .respond(TurnInput { user_query: "tell me something", chat_history: "" })
        .await
        .unwrap();
    assert_eq!(stream.collect().await.unwrap(), "Direct answer.");
}

#[tokio::test]
async fn streamed_reply_arrives_in_multiple_chunks() {
    let chain = chain(NO_LOOKUPS, "one two three four", ChainMode::Single);
    let mut stream = chain
        .respond(TurnInput { user_query: "q", chat_history: "" })
        .await
        .unwrap();

    let mut chunks = 0;
    let mut text = String::new();
    while let Some(item) = stream.next().await {
        text.push_str(&item.unwrap());
        chunks += 1;
    }
    assert!(chunks > 1, "expected a chunked stream, got {chunks} chunk(s)");
    assert_eq!(text, "one two three four");
}
