//! Caller identity extraction.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use reclaim_types::UserId;

use crate::error::ApiError;

/// Header carrying the authenticated caller's identity.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller. Rejects requests without a usable identity.
#[derive(Clone, Debug)]
pub struct Caller(pub UserId);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or(ApiError::MissingIdentity)?;
        let raw = raw.to_str().map_err(|_| ApiError::InvalidIdentity)?;
        UserId::new(raw)
            .map(Caller)
            .map_err(|_| ApiError::InvalidIdentity)
    }
}
