//! Transaction views handed to `Store::read` / `Store::write` closures.

use heed::types::Bytes;
use heed::{Database, RoTxn, RwTxn};
use serde::de::DeserializeOwned;

use crate::LmdbError;

/// Every database handle in the environment.
#[derive(Clone, Copy)]
pub(crate) struct Databases {
    /// item id → bincode `Item`
    pub items: Database<Bytes, Bytes>,
    /// claim id → bincode `Claim`
    pub claims: Database<Bytes, Bytes>,
    /// item id ++ claimant → claim id
    pub claim_index: Database<Bytes, Bytes>,
    /// len(user) ++ user ++ item id → ()
    pub bindings: Database<Bytes, Bytes>,
    pub meta: Database<Bytes, Bytes>,
}

/// A transaction plus the handles it operates on. `T` is either a
/// [`RoTxn`] (read snapshot) or a [`RwTxn`] (write transaction).
pub(crate) struct LmdbTxn<'e, T> {
    pub dbs: &'e Databases,
    pub txn: T,
}

/// Read access shared by both transaction kinds.
pub(crate) trait AsRoTxn<'e> {
    fn ro(&self) -> &RoTxn<'e>;
}

impl<'e> AsRoTxn<'e> for RoTxn<'e> {
    fn ro(&self) -> &RoTxn<'e> {
        self
    }
}

impl<'e> AsRoTxn<'e> for RwTxn<'e> {
    fn ro(&self) -> &RoTxn<'e> {
        self
    }
}

pub(crate) fn decode<V: DeserializeOwned>(bytes: &[u8]) -> Result<V, LmdbError> {
    Ok(bincode::deserialize(bytes)?)
}

pub(crate) fn id_bytes(raw: &[u8], what: &str) -> Result<[u8; 16], LmdbError> {
    raw.try_into()
        .map_err(|_| LmdbError::Corrupt(format!("{what} has {} bytes, expected 16", raw.len())))
}
