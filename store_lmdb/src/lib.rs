//! LMDB storage backend for reclaim.
//!
//! Implements the `reclaim-store` traits on top of the `heed` LMDB bindings.
//! Items and claims live in one environment, alongside two secondary indexes:
//! the (item, claimant) claim index, which doubles as the uniqueness
//! constraint, and the user → bound items index.

mod claim;
pub mod environment;
pub mod error;
mod item;
mod keys;
pub mod meta;
mod txn;

pub use environment::{LmdbStore, DEFAULT_MAP_SIZE};
pub use error::LmdbError;
pub use meta::SCHEMA_VERSION;
