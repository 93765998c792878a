//! Abstract storage traits for reclaim.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The rest of the codebase depends only on the traits.
//!
//! All access goes through a transaction obtained from [`Store`]: a read
//! snapshot for queries, or a write transaction that commits only when the
//! closure succeeds. Writers are serialized, so a read-validate-write sequence
//! inside one [`Store::write`] call cannot interleave with another.

pub mod claim;
pub mod error;
pub mod item;

pub use claim::{ClaimReader, ClaimWriter};
pub use error::StoreError;
pub use item::{ItemFilter, ItemReader, ItemWriter};

/// A consistent read view over items and claims.
pub trait ReadTxn: ItemReader + ClaimReader {}

impl<T: ItemReader + ClaimReader + ?Sized> ReadTxn for T {}

/// A writable transaction (extends [`ReadTxn`]); reads observe its own writes.
pub trait WriteTxn: ReadTxn + ItemWriter + ClaimWriter {}

impl<T: ReadTxn + ItemWriter + ClaimWriter + ?Sized> WriteTxn for T {}

/// Entry point to a storage backend.
pub trait Store: Send + Sync {
    /// Run `f` against a read snapshot.
    fn read<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&dyn ReadTxn) -> Result<T, E>,
        E: From<StoreError>;

    /// Run `f` inside a write transaction. The transaction commits iff `f`
    /// returns `Ok`; otherwise every write made by `f` is discarded.
    fn write<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn WriteTxn) -> Result<T, E>,
        E: From<StoreError>;
}
