//! HTTP API for the reclaim service.
//!
//! Provides endpoints for:
//! - Reporting found and lost items
//! - Item queries, updates and deletion
//! - Claim submission, answers and decisions
//! - QR fast-path verification
//! - Health and Prometheus metrics
//!
//! Caller identity comes from the `X-User-Id` header set by the upstream
//! authentication layer.

pub mod error;
pub mod handlers;
pub mod identity;
pub mod metrics;
pub mod pagination;
pub mod server;

pub use error::ApiError;
pub use identity::{Caller, USER_ID_HEADER};
pub use metrics::RequestMetrics;
pub use server::RpcServer;
