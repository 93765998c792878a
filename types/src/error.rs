//! Errors raised while constructing or mutating fundamental types.

use thiserror::Error;

use crate::state::ItemStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("invalid user id: {0:?}")]
    InvalidUserId(String),

    #[error("invalid identifier: {0:?}")]
    InvalidId(String),

    #[error("unknown {kind}: {value:?}")]
    UnknownVariant { kind: &'static str, value: String },

    #[error("item status cannot move from {from} to {to}")]
    StatusRegression { from: ItemStatus, to: ItemStatus },
}
