//! Prometheus counters for the match dispatcher.

use prometheus::{register_int_counter_with_registry, IntCounter, Opts, Registry};

pub struct DispatchMetrics {
    /// Candidates accepted onto the queue.
    pub enqueued: IntCounter,
    /// Candidates dropped because the queue was full or closed.
    pub dropped: IntCounter,
    /// Candidates the matching service accepted.
    pub succeeded: IntCounter,
    /// Candidates abandoned after the last attempt failed.
    pub failed: IntCounter,
    /// Attempts that failed and were retried.
    pub retried: IntCounter,
}

impl DispatchMetrics {
    /// Create the counters and register them with `registry`.
    pub fn register(registry: &Registry) -> Result<Self, prometheus::Error> {
        let counter = |name: &str, help: &str| {
            register_int_counter_with_registry!(Opts::new(name, help), registry)
        };
        Ok(Self {
            enqueued: counter(
                "reclaim_match_enqueued_total",
                "Found items queued for matching",
            )?,
            dropped: counter(
                "reclaim_match_dropped_total",
                "Found items dropped because the match queue was full",
            )?,
            succeeded: counter(
                "reclaim_match_succeeded_total",
                "Found items accepted by the matching service",
            )?,
            failed: counter(
                "reclaim_match_failed_total",
                "Found items abandoned after exhausting retries",
            )?,
            retried: counter(
                "reclaim_match_retried_total",
                "Match attempts retried after a failure",
            )?,
        })
    }
}
