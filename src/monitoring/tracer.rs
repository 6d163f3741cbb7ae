/*!
 * Structured Tracing
 * Subscriber setup and wait spans using the tracing crate
 *
 * Features:
 * - EnvFilter driven levels
 * - JSON-formatted logs for structured parsing
 * - Per-wait spans recording how long a consumer stayed blocked
 */

use std::time::Instant;
use tracing::{debug, span, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Environment variable that switches output to JSON
pub const TRACE_JSON_ENV: &str = "FAIR_QUEUE_TRACE_JSON";

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - FAIR_QUEUE_TRACE_JSON: Enable JSON output (default: false)
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing() -> bool {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var(TRACE_JSON_ENV)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
            .is_ok()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
            .is_ok()
    };

    if installed {
        debug!(json = use_json, "Structured tracing initialized");
    }
    installed
}

/// Span covering one consumer's time in the waiter registry
pub struct WaitSpan {
    span: tracing::Span,
    start: Instant,
}

impl WaitSpan {
    pub fn new(queue: &str, index: u64) -> Self {
        let span = span!(
            Level::TRACE,
            "wait",
            queue = %queue,
            index = index,
            waited_us = tracing::field::Empty,
            outcome = tracing::field::Empty,
        );
        Self {
            span,
            start: Instant::now(),
        }
    }

    /// Record how the wait ended ("served", "timeout", "closed")
    pub fn record_outcome(&self, outcome: &'static str) {
        self.span.record("outcome", outcome);
    }
}

impl Drop for WaitSpan {
    fn drop(&mut self) {
        self.span
            .record("waited_us", self.start.elapsed().as_micros() as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_span_without_subscriber() {
        let span = WaitSpan::new("test", 3);
        span.record_outcome("served");
        drop(span);
    }
}
