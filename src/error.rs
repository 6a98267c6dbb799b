//! Error types for pcapscope.

use thiserror::Error;

pub use pcapscope_core::error::{Error, Result, TableError};

/// Errors raised by the storage adapter.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Saving with [`SaveMode::Create`](crate::storage::SaveMode) over an existing slot
    #[error("slot '{0}' already exists")]
    SlotExists(String),

    /// Loading or deleting a slot that was never saved
    #[error("slot '{0}' not found")]
    SlotNotFound(String),

    /// Slot names are limited to ASCII letters, digits, `_` and `-`
    #[error("invalid slot name '{0}'")]
    InvalidSlotName(String),

    /// A stored value does not match its declared column type
    #[error("cannot decode column '{column}': {reason}")]
    Decode { column: String, reason: String },

    /// Loaded rows violate table invariants
    #[error("table error: {0}")]
    Table(#[from] TableError),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StorageError {
    pub(crate) fn decode(column: &str, reason: impl Into<String>) -> Self {
        StorageError::Decode {
            column: column.to_string(),
            reason: reason.into(),
        }
    }
}
