use thiserror::Error;

#[derive(Debug, Error)]
pub enum LmdbError {
    #[error("LMDB error: {0}")]
    Heed(#[from] heed::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("schema version {found} does not match expected {expected}")]
    Schema { found: u32, expected: u32 },

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl From<LmdbError> for reclaim_store::StoreError {
    fn from(e: LmdbError) -> Self {
        use reclaim_store::StoreError;
        match e {
            LmdbError::Serialization(inner) => StoreError::Serialization(inner.to_string()),
            LmdbError::Schema { found, expected } => StoreError::SchemaMismatch { found, expected },
            other => StoreError::Backend(other.to_string()),
        }
    }
}
