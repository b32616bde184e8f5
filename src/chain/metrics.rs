//! Stream latency accounting — time-to-first-chunk, total time, bytes.
//!
//! The clock starts when the tracker is created, which the chain does
//! *before* the orchestrator call: time-to-first-byte covers the decision,
//! the lookups, and the first summarizer chunk, matching what a user
//! actually waits for.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::info;

use crate::llm::TokenStream;

/// Numbers observed for one tracked stream. `ttfb`/`total` stay `None`
/// until the corresponding event has happened.
#[derive(Debug, Clone, Default)]
pub struct LatencyReport {
    pub ttfb: Option<Duration>,
    pub total: Option<Duration>,
    pub bytes_received: usize,
    pub chunks: usize,
}

/// Wraps a [`TokenStream`], forwarding chunks unchanged while recording
/// latency numbers into a shared report.
pub struct StreamLatencyTracker {
    started: Instant,
    shared: Arc<Mutex<LatencyReport>>,
}

impl StreamLatencyTracker {
    /// Start the clock now.
    pub fn start() -> Self {
        Self { started: Instant::now(), shared: Arc::default() }
    }

    /// Snapshot of the numbers recorded so far.
    pub fn report(&self) -> LatencyReport {
        lock(&self.shared).clone()
    }

    /// Forward `stream` through the tracker. TTFB is recorded and logged
    /// once, on the first successful chunk; totals are recorded when the
    /// stream ends.
    pub fn track(&self, stream: TokenStream, label: &'static str) -> TokenStream {
        let (tx, out) = TokenStream::channel();
        let shared = Arc::clone(&self.shared);
        let started = self.started;

        tokio::spawn(async move {
            let mut stream = stream;
            let mut first = true;
            while let Some(item) = stream.next().await {
                if let Ok(chunk) = &item {
                    let mut stats = lock(&shared);
                    if first {
                        first = false;
                        let ttfb = started.elapsed();
                        stats.ttfb = Some(ttfb);
                        info!(%label, ttfb_ms = ttfb.as_millis() as u64, "time to first chunk");
                    }
                    stats.bytes_received += chunk.len();
                    stats.chunks += 1;
                }
                if tx.send(item).await.is_err() {
                    return; // consumer hung up
                }
            }

            let mut stats = lock(&shared);
            let total = started.elapsed();
            stats.total = Some(total);
            info!(
                %label,
                total_ms = total.as_millis() as u64,
                bytes = stats.bytes_received,
                chunks = stats.chunks,
                "stream complete"
            );
        });

        out
    }
}

/// Recover the report even when a forwarder panicked mid-update.
fn lock(shared: &Mutex<LatencyReport>) -> std::sync::MutexGuard<'_, LatencyReport> {
    shared.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ProviderError;

    #[tokio::test]
    async fn records_ttfb_and_totals() {
        let tracker = StreamLatencyTracker::start();
        let stream = TokenStream::from_chunks(vec!["ab".into(), "cde".into()]);
        let tracked = tracker.track(stream, "test");

        let text = tracked.collect().await.unwrap();
        assert_eq!(text, "abcde");

        let report = tracker.report();
        assert!(report.ttfb.is_some());
        assert!(report.total.is_some());
        assert!(report.ttfb.unwrap() <= report.total.unwrap());
        assert_eq!(report.bytes_received, 5);
        assert_eq!(report.chunks, 2);
    }

    #[tokio::test]
    async fn chunks_pass_through_unchanged() {
        let tracker = StreamLatencyTracker::start();
        let stream = TokenStream::from_chunks(vec!["x ".into(), "y".into()]);
        let mut tracked = tracker.track(stream, "test");
        assert_eq!(tracked.next().await.unwrap().unwrap(), "x ");
        assert_eq!(tracked.next().await.unwrap().unwrap(), "y");
        assert!(tracked.next().await.is_none());
    }

    #[tokio::test]
    async fn errors_forwarded_without_ttfb() {
        let tracker = StreamLatencyTracker::start();
        let (tx, stream) = TokenStream::channel();
        tx.send(Err(ProviderError::Stream("reset".into()))).await.unwrap();
        drop(tx);

        let tracked = tracker.track(stream, "test");
        assert!(tracked.collect().await.is_err());
        // error chunks do not count as first byte
        assert!(tracker.report().ttfb.is_none());
    }

    #[tokio::test]
    async fn empty_stream_records_total_only() {
        let tracker = StreamLatencyTracker::start();
        let tracked = tracker.track(TokenStream::from_chunks(Vec::new()), "test");
        // collect only returns once the forwarder has hung up, and the
        // forwarder records the total before doing so
        assert_eq!(tracked.collect().await.unwrap(), "");
        let report = tracker.report();
        assert!(report.ttfb.is_none());
        assert!(report.total.is_some());
        assert_eq!(report.bytes_received, 0);
    }
}
