//! Schema version bookkeeping.
//!
//! The meta database records the layout version the store was written with.
//! A fresh environment is stamped with [`SCHEMA_VERSION`]; an older version is
//! migrated forward step by step; a newer one is refused.

use heed::types::Bytes;
use heed::{Database, Env, RoTxn};

use crate::LmdbError;

/// The on-disk layout this code reads and writes.
pub const SCHEMA_VERSION: u32 = 1;

const SCHEMA_VERSION_KEY: &[u8] = b"schema_version";

/// Stored schema version, `None` for a fresh environment.
pub(crate) fn stored_version(
    meta: &Database<Bytes, Bytes>,
    txn: &RoTxn<'_>,
) -> Result<Option<u32>, LmdbError> {
    match meta.get(txn, SCHEMA_VERSION_KEY)? {
        None => Ok(None),
        Some(bytes) => {
            let arr: [u8; 4] = bytes.try_into().map_err(|_| {
                LmdbError::Corrupt(format!("schema version has {} bytes", bytes.len()))
            })?;
            Ok(Some(u32::from_le_bytes(arr)))
        }
    }
}

/// Bring the environment up to [`SCHEMA_VERSION`], or refuse it.
pub(crate) fn ensure_schema(env: &Env, meta: &Database<Bytes, Bytes>) -> Result<(), LmdbError> {
    let mut wtxn = env.write_txn()?;
    let current = stored_version(meta, &wtxn)?.unwrap_or(0);

    if current == SCHEMA_VERSION {
        tracing::debug!(version = current, "store schema is up to date");
        return Ok(());
    }
    if current > SCHEMA_VERSION {
        return Err(LmdbError::Schema {
            found: current,
            expected: SCHEMA_VERSION,
        });
    }

    for version in current..SCHEMA_VERSION {
        tracing::info!(from = version, to = version + 1, "migrating store schema");
        migrate(version, version + 1)?;
    }
    meta.put(&mut wtxn, SCHEMA_VERSION_KEY, &SCHEMA_VERSION.to_le_bytes())?;
    wtxn.commit()?;
    Ok(())
}

/// Overwrite the recorded version. Only used to simulate foreign stores.
#[cfg(test)]
pub(crate) fn force_version(
    env: &Env,
    meta: &Database<Bytes, Bytes>,
    version: u32,
) -> Result<(), LmdbError> {
    let mut wtxn = env.write_txn()?;
    meta.put(&mut wtxn, SCHEMA_VERSION_KEY, &version.to_le_bytes())?;
    wtxn.commit()?;
    Ok(())
}

fn migrate(from: u32, to: u32) -> Result<(), LmdbError> {
    match (from, to) {
        // Blank environment: the databases were just created.
        (0, 1) => Ok(()),
        _ => Err(LmdbError::Corrupt(format!("no migration from {from} to {to}"))),
    }
}
