//! Clients for the external matching service.

use std::time::Duration;

use async_trait::async_trait;

use crate::candidate::MatchCandidate;
use crate::error::MatchError;

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Something that accepts match candidates.
#[async_trait]
pub trait Matcher: Send + Sync {
    async fn submit(&self, candidate: &MatchCandidate) -> Result<(), MatchError>;
}

/// Posts candidates to `{endpoint}/match` as JSON.
pub struct HttpMatcher {
    endpoint: String,
    /// HTTP client (reusable connection pool).
    http_client: reqwest::Client,
}

impl HttpMatcher {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT.min(timeout))
            .build()
            .unwrap_or_default();
        Self {
            endpoint: endpoint.into(),
            http_client,
        }
    }

    pub fn url(&self) -> String {
        format!("{}/match", self.endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl Matcher for HttpMatcher {
    async fn submit(&self, candidate: &MatchCandidate) -> Result<(), MatchError> {
        let response = self
            .http_client
            .post(self.url())
            .json(candidate)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MatchError::Unreachable(format!("request timed out: {e}"))
                } else if e.is_connect() {
                    MatchError::Unreachable(format!("connection failed: {e}"))
                } else {
                    MatchError::RequestFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(MatchError::Rejected(response.status().as_u16()));
        }
        Ok(())
    }
}

/// Used when no matching endpoint is configured: accepts and discards.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisabledMatcher;

#[async_trait]
impl Matcher for DisabledMatcher {
    async fn submit(&self, candidate: &MatchCandidate) -> Result<(), MatchError> {
        tracing::debug!(item = %candidate.item_id, "matching disabled, candidate discarded");
        Ok(())
    }
}
