//! Shared utilities for reclaim services.

pub mod logging;

pub use logging::{init_logging, LogFormat, LoggingError};
