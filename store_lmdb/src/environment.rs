//! LMDB environment setup and the [`Store`] implementation.

use std::path::Path;

use heed::{Env, EnvOpenOptions};

use reclaim_store::{ReadTxn, Store, StoreError, WriteTxn};

use crate::meta;
use crate::txn::{Databases, LmdbTxn};
use crate::LmdbError;

/// Default memory map size (1 GiB).
pub const DEFAULT_MAP_SIZE: usize = 1 << 30;

const MAX_DBS: u32 = 8;

/// An LMDB environment holding items, claims and their indexes.
///
/// LMDB allows a single writer at a time, so every [`Store::write`] closure
/// runs in isolation: a check followed by an insert inside one closure is
/// atomic with respect to every other writer.
pub struct LmdbStore {
    env: Env,
    dbs: Databases,
}

impl LmdbStore {
    /// Open or create a store under `path`.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;
        // SAFETY: the environment is opened once per process for this
        // directory and the map is never resized while transactions are live.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let dbs = Databases {
            items: env.create_database(&mut wtxn, Some("items"))?,
            claims: env.create_database(&mut wtxn, Some("claims"))?,
            claim_index: env.create_database(&mut wtxn, Some("claim_index"))?,
            bindings: env.create_database(&mut wtxn, Some("bindings"))?,
            meta: env.create_database(&mut wtxn, Some("meta"))?,
        };
        wtxn.commit()?;

        meta::ensure_schema(&env, &dbs.meta)?;
        tracing::info!(path = %path.display(), map_size, "opened LMDB store");

        Ok(Self { env, dbs })
    }

    /// The schema version recorded in the environment.
    pub fn schema_version(&self) -> Result<Option<u32>, LmdbError> {
        let rtxn = self.env.read_txn()?;
        meta::stored_version(&self.dbs.meta, &rtxn)
    }

    /// Flush the environment to disk.
    pub fn force_sync(&self) -> Result<(), LmdbError> {
        self.env.force_sync()?;
        Ok(())
    }
}

impl Store for LmdbStore {
    fn read<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&dyn ReadTxn) -> Result<T, E>,
        E: From<StoreError>,
    {
        let txn = self
            .env
            .read_txn()
            .map_err(|e| StoreError::from(LmdbError::from(e)))?;
        let view = LmdbTxn {
            dbs: &self.dbs,
            txn,
        };
        f(&view)
    }

    fn write<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn WriteTxn) -> Result<T, E>,
        E: From<StoreError>,
    {
        let txn = self
            .env
            .write_txn()
            .map_err(|e| StoreError::from(LmdbError::from(e)))?;
        let mut view = LmdbTxn {
            dbs: &self.dbs,
            txn,
        };
        // Dropping an uncommitted RwTxn aborts it.
        let out = f(&mut view)?;
        view.txn
            .commit()
            .map_err(|e| StoreError::from(LmdbError::from(e)))?;
        Ok(out)
    }
}
