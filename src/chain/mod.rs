//! The decide → fetch → summarize pipeline.
//!
//! Each user turn flows through one of three variants:
//!
//! ```text
//! single:  orchestrator ──> SearchTask ──> ≤1 web + ≤1 weather lookup ──> summarizer stream
//! multi:   orchestrator ──> MultiSearchTask ──> N sequential lookups  ──> summarizer stream
//! simple:  ───────────────────────────────────────────────────────────> summarizer stream
//! ```
//!
//! Execution is strictly sequential: one decision call, then zero or more
//! awaited lookups in order, then one streaming generation call whose
//! chunks are forwarded as produced. Failures propagate to the caller;
//! there are no retries.

pub mod metrics;
pub mod prompt;
pub mod task;

use tracing::{debug, warn};

use crate::config::ChainMode;
use crate::error::AppError;
use crate::llm::{LlmProvider, TokenStream};
use crate::tools::Toolbox;

use metrics::StreamLatencyTracker;
use prompt::PromptSet;
use task::{MultiSearchTask, SearchTask};

/// One user turn's inputs: the raw query plus the rendered transcript.
#[derive(Debug, Clone, Copy)]
pub struct TurnInput<'a> {
    pub user_query: &'a str,
    pub chat_history: &'a str,
}

/// The pipeline, assembled once at startup and reused for every turn.
pub struct SearchChain {
    orchestrator: LlmProvider,
    summarizer: LlmProvider,
    tools: Toolbox,
    prompts: PromptSet,
    mode: ChainMode,
    track_metrics: bool,
}

impl SearchChain {
    pub fn new(
        orchestrator: LlmProvider,
        summarizer: LlmProvider,
        tools: Toolbox,
        prompts: PromptSet,
        mode: ChainMode,
        track_metrics: bool,
    ) -> Self {
        Self { orchestrator, summarizer, tools, prompts, mode, track_metrics }
    }

    /// Run one user turn through the configured variant.
    pub async fn respond(&self, input: TurnInput<'_>) -> Result<TokenStream, AppError> {
        match self.mode {
            ChainMode::Single => self.respond_single(input).await,
            ChainMode::Multi => self.respond_multi(input).await,
            ChainMode::Simple => self.respond_simple(input).await,
        }
    }

    /// Single-task variant: one boolean-gated web lookup + one boolean-gated
    /// weather lookup.
    pub async fn respond_single(&self, input: TurnInput<'_>) -> Result<TokenStream, AppError> {
        let tracker = self.tracker();

        let task = self.decide::<SearchTask>(&self.prompts.orchestrator, input).await?;
        debug!(?task, "orchestrator decision");

        let mut web_results = String::new();
        if task.should_search_web {
            if let Some(query) = non_empty(&task.web_query, "web search") {
                web_results = self.tools.web_search.search(query, task.web_query_count).await?;
            }
        }

        let mut weather_results = String::new();
        if task.should_search_weather {
            if let Some(location) = non_empty(&task.weather_query, "weather") {
                weather_results = self.tools.weather.current(location).await?;
            }
        }

        self.summarize(input, &web_results, &weather_results, tracker).await
    }

    /// Multi-task variant: lists of sub-queries, fetched sequentially in
    /// task-list order.
    pub async fn respond_multi(&self, input: TurnInput<'_>) -> Result<TokenStream, AppError> {
        let tracker = self.tracker();

        let task = self.decide::<MultiSearchTask>(&self.prompts.multi_orchestrator, input).await?;
        debug!(
            web_tasks = task.web_tasks.len(),
            weather_tasks = task.weather_tasks.len(),
            "orchestrator decision"
        );

        let mut web_results = Vec::new();
        if task.should_search_web {
            for web_task in &task.web_tasks {
                if let Some(query) = non_empty(&web_task.query, "web search") {
                    web_results.push(self.tools.web_search.search(query, web_task.query_count).await?);
                }
            }
        }

        let mut weather_results = Vec::new();
        if task.should_search_weather {
            for weather_task in &task.weather_tasks {
                if let Some(location) = non_empty(&weather_task.location, "weather") {
                    weather_results.push(self.tools.weather.current(location).await?);
                }
            }
        }

        self.summarize(input, &web_results.join("\n\n"), &weather_results.join("\n\n"), tracker)
            .await
    }

    /// Simple variant: no orchestration, no lookups.
    pub async fn respond_simple(&self, input: TurnInput<'_>) -> Result<TokenStream, AppError> {
        let tracker = self.tracker();
        self.summarize(input, "", "", tracker).await
    }

    fn tracker(&self) -> Option<StreamLatencyTracker> {
        // The clock starts before the orchestrator call: TTFB covers the
        // whole turn, not just the summarizer stream.
        self.track_metrics.then(StreamLatencyTracker::start)
    }

    /// The orchestrator step: render the decision prompt, run one completion,
    /// parse the reply into a task record.
    async fn decide<T>(
        &self,
        template: &prompt::PromptTemplate,
        input: TurnInput<'_>,
    ) -> Result<T, AppError>
    where
        T: FromOrchestratorReply,
    {
        let rendered = template.render(&[
            ("user_query", input.user_query),
            ("chat_history", input.chat_history),
        ]);
        let reply = self.orchestrator.complete(&rendered, None).await?;
        if let Some(usage) = &reply.usage {
            debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "orchestrator usage"
            );
        }
        T::from_reply(&reply.text).map_err(|e| AppError::Chain(format!("orchestrator output: {e}")))
    }

    /// The summarizer step: render the final prompt with lookup results
    /// interpolated as text and stream the reply.
    async fn summarize(
        &self,
        input: TurnInput<'_>,
        web_results: &str,
        weather_results: &str,
        tracker: Option<StreamLatencyTracker>,
    ) -> Result<TokenStream, AppError> {
        let rendered = self.prompts.summarizer.render(&[
            ("user_query", input.user_query),
            ("chat_history", input.chat_history),
            ("web_results", web_results),
            ("weather_results", weather_results),
        ]);

        let stream = self.summarizer.complete_stream(&rendered, None).await?;
        Ok(match tracker {
            Some(t) => t.track(stream, "search_chain"),
            None => stream,
        })
    }
}

/// `None` (with a warning) when the orchestrator set a flag but produced no
/// query to go with it — the record's internal consistency is not guaranteed.
fn non_empty<'a>(value: &'a str, what: &str) -> Option<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        warn!("{what} requested with an empty query — skipping lookup");
        None
    } else {
        Some(trimmed)
    }
}

/// Glue so the orchestrator step can parse either task shape.
pub trait FromOrchestratorReply: Sized {
    fn from_reply(raw: &str) -> Result<Self, task::TaskParseError>;
}

impl FromOrchestratorReply for SearchTask {
    fn from_reply(raw: &str) -> Result<Self, task::TaskParseError> {
        SearchTask::parse(raw)
    }
}

impl FromOrchestratorReply for MultiSearchTask {
    fn from_reply(raw: &str) -> Result<Self, task::TaskParseError> {
        MultiSearchTask::parse(raw)
    }
}
