//! Persistence of analysis tables.
//!
//! A saved table is a *slot*: one SQLite table whose columns are the
//! flattened column names. Each column's declared type is the
//! [`DataKind`](pcapscope_core::schema::DataKind) type name, so a slot can be
//! decoded back into the same [`FieldValue`](pcapscope_core::FieldValue)
//! variants without side tables.

mod codec;
mod sqlite;

pub use codec::{decode_value, encode_value, infer_kind};
pub use sqlite::SqliteStorage;

/// Behavior of `save` when the slot already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveMode {
    /// Fail with [`StorageError::SlotExists`](crate::error::StorageError::SlotExists)
    #[default]
    Create,
    /// Drop the existing slot first
    Replace,
}
