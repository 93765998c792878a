//! Nullable infrastructure for deterministic testing.
//!
//! Every external collaborator of the claim engine (clock, storage,
//! notification delivery, the match queue) sits behind a trait. This crate
//! provides test-friendly implementations that:
//! - Return deterministic values
//! - Record what was sent to them for later assertions
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod outbox;
pub mod store;

pub use clock::NullClock;
pub use outbox::{NullMatchQueue, NullNotifier};
pub use store::NullStore;
