//! LLM provider abstraction.
//!
//! `LlmProvider` is an enum over concrete provider implementations.
//! Add a new variant + module in `providers/` for each additional backend.
//!
//! Provider instances are shared immutable capabilities — clone them freely.
//! Async is delegated to the underlying provider; `complete` and
//! `complete_stream` are `async fn` on the enum so callers need no
//! trait-object machinery.

pub mod providers;

use thiserror::Error;
use tokio::sync::mpsc;

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
    #[error("provider request failed: {0}")]
    Request(String),
    #[error("provider stream failed: {0}")]
    Stream(String),
}

// ── Response types ────────────────────────────────────────────────────────────

/// Token accounting reported by the provider, when available.
#[derive(Debug, Clone)]
pub struct LlmUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// A completed (non-streaming) provider reply.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub text: String,
    pub usage: Option<LlmUsage>,
}

// ── TokenStream ───────────────────────────────────────────────────────────────

/// Buffer size for in-flight stream chunks. Producers block once the consumer
/// falls this far behind; chunks are never dropped.
const STREAM_BUFFER: usize = 32;

/// Pull-based stream of generated text chunks.
///
/// Chunks arrive in production order through a bounded channel; the producer
/// side lives in a spawned task owned by the provider (or, in tests, is a
/// pre-filled buffer). Dropping the stream hangs up the channel and the
/// producer task winds down on its next send.
#[derive(Debug)]
pub struct TokenStream {
    rx: mpsc::Receiver<Result<String, ProviderError>>,
}

impl TokenStream {
    /// Create a sender/stream pair with the standard buffer size.
    pub(crate) fn channel() -> (mpsc::Sender<Result<String, ProviderError>>, Self) {
        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        (tx, Self { rx })
    }

    /// A stream that yields the given chunks and ends. Used by the dummy
    /// provider and by tests that need deterministic streams.
    pub fn from_chunks(chunks: Vec<String>) -> Self {
        let (tx, rx) = mpsc::channel(chunks.len().max(1));
        for chunk in chunks {
            // Capacity covers every chunk; try_send cannot fail here.
            let _ = tx.try_send(Ok(chunk));
        }
        Self { rx }
    }

    /// Next chunk, or `None` once the stream is exhausted.
    pub async fn next(&mut self) -> Option<Result<String, ProviderError>> {
        self.rx.recv().await
    }

    /// Drain the stream into a single string, stopping at the first error.
    pub async fn collect(mut self) -> Result<String, ProviderError> {
        let mut out = String::new();
        while let Some(item) = self.next().await {
            out.push_str(&item?);
        }
        Ok(out)
    }
}

// ── Provider enum ─────────────────────────────────────────────────────────────

/// All available provider backends.
///
/// Enum dispatch avoids `dyn` trait objects and the `async-trait` dependency.
/// Adding a backend = new module + new variant + new match arms.
#[derive(Debug, Clone)]
pub enum LlmProvider {
    Dummy(providers::dummy::DummyProvider),
    OpenAiCompatible(providers::openai_compatible::OpenAiCompatibleProvider),
}

impl LlmProvider {
    /// One blocking round-trip: send `content` (with an optional system
    /// prompt) and return the full text reply.
    pub async fn complete(
        &self,
        content: &str,
        system: Option<&str>,
    ) -> Result<LlmResponse, ProviderError> {
        match self {
            LlmProvider::Dummy(p) => p.complete(content).await,
            LlmProvider::OpenAiCompatible(p) => p.complete(content, system).await,
        }
    }

    /// Streaming round-trip: chunks are forwarded as the provider produces
    /// them. The request itself (connect + status check) happens before this
    /// returns; only body consumption is deferred to the stream.
    pub async fn complete_stream(
        &self,
        content: &str,
        system: Option<&str>,
    ) -> Result<TokenStream, ProviderError> {
        match self {
            LlmProvider::Dummy(p) => p.complete_stream(content).await,
            LlmProvider::OpenAiCompatible(p) => p.complete_stream(content, system).await,
        }
    }
}
