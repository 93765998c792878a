//! The reclaim service node.
//!
//! Wires the pieces together:
//! - LMDB storage
//! - the claim engine, with notifications logged through `tracing`
//! - the bounded match queue and its background worker
//! - the HTTP API, optionally exposing Prometheus metrics
//! - graceful shutdown on SIGINT/SIGTERM

pub mod config;
pub mod error;
pub mod node;
pub mod shutdown;

pub use config::{MatchingConfig, NodeConfig};
pub use error::NodeError;
pub use node::ReclaimNode;
pub use shutdown::ShutdownController;
