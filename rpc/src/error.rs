//! API errors and their HTTP mapping.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use reclaim_claims::{ClaimError, ErrorKind};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Claim(#[from] ClaimError),

    #[error("missing X-User-Id header")]
    MissingIdentity,

    #[error("X-User-Id header is not a valid identity")]
    InvalidIdentity,

    #[error("malformed request body: {0}")]
    MalformedPayload(String),

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("'{0}' is not a valid id")]
    InvalidId(String),

    #[error("invalid pagination cursor")]
    InvalidCursor,

    #[error("metrics are disabled")]
    MetricsDisabled,

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Claim(e) => match e.kind() {
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Authorization => StatusCode::FORBIDDEN,
                ErrorKind::Conflict => StatusCode::CONFLICT,
                ErrorKind::Infrastructure => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::MissingIdentity | Self::InvalidIdentity => StatusCode::UNAUTHORIZED,
            Self::MalformedPayload(_)
            | Self::InvalidQuery(_)
            | Self::InvalidId(_)
            | Self::InvalidCursor => StatusCode::BAD_REQUEST,
            Self::MetricsDisabled => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable reason, also used as the metrics outcome label.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Claim(e) => e.reason(),
            Self::MissingIdentity => "missing_identity",
            Self::InvalidIdentity => "invalid_identity",
            Self::MalformedPayload(_) => "malformed_payload",
            Self::InvalidQuery(_) => "invalid_query",
            Self::InvalidId(_) => "invalid_id",
            Self::InvalidCursor => "invalid_cursor",
            Self::MetricsDisabled => "metrics_disabled",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedPayload(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidQuery(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Never expose storage internals.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        let body = ErrorBody {
            error: self.reason(),
            message,
        };
        (status, Json(body)).into_response()
    }
}
