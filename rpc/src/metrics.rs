//! Request counters.

use prometheus::{register_int_counter_vec_with_registry, IntCounterVec, Opts, Registry};

use crate::error::ApiError;

/// Label recorded for successful requests.
pub const OUTCOME_OK: &str = "ok";

pub struct RequestMetrics {
    requests: IntCounterVec,
}

impl RequestMetrics {
    pub fn register(registry: &Registry) -> Result<Self, prometheus::Error> {
        let requests = register_int_counter_vec_with_registry!(
            Opts::new(
                "reclaim_http_requests_total",
                "HTTP requests by route and outcome"
            ),
            &["route", "outcome"],
            registry
        )?;
        Ok(Self { requests })
    }

    /// Count one request on `route`: `ok` or the error's reason code.
    pub fn observe<T>(&self, route: &str, result: &Result<T, ApiError>) {
        let outcome = match result {
            Ok(_) => OUTCOME_OK,
            Err(e) => e.reason(),
        };
        self.requests.with_label_values(&[route, outcome]).inc();
    }

    pub fn count(&self, route: &str, outcome: &str) -> u64 {
        self.requests.with_label_values(&[route, outcome]).get()
    }
}
