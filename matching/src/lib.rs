//! Hand-off of freshly reported found items to the external matching
//! service.
//!
//! The claim engine sees only the [`reclaim_claims::MatchQueue`] port; this
//! crate implements it with a bounded channel, a background worker with
//! retry and backoff, and counters for everything that gets dropped or fails.

pub mod backoff;
pub mod candidate;
pub mod client;
pub mod dispatcher;
pub mod error;
pub mod metrics;

pub use backoff::RetryPolicy;
pub use candidate::MatchCandidate;
pub use client::{DisabledMatcher, HttpMatcher, Matcher};
pub use dispatcher::{run_worker, MatchDispatcher, MatchReceiver};
pub use error::MatchError;
pub use metrics::DispatchMetrics;
