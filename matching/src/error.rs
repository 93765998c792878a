use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("matching service unreachable: {0}")]
    Unreachable(String),

    #[error("match request failed: {0}")]
    RequestFailed(String),

    #[error("matching service rejected candidate: HTTP status {0}")]
    Rejected(u16),
}
