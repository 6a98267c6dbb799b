//! SQLite storage adapter.

use std::path::Path;

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension};
use tracing::{debug, info};

use pcapscope_core::flatten::Row;
use pcapscope_core::schema::{ColumnTypes, DataKind, PACKET_UID};
use pcapscope_core::Table;

use super::codec::{decode_value, encode_value, infer_kind};
use super::SaveMode;
use crate::error::StorageError;

/// SQLite storage class a column is declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqliteType {
    Integer,
    Text,
    Blob,
}

impl SqliteType {
    /// Returns the SQLite type keyword for CREATE TABLE statements.
    pub fn as_sql_keyword(&self) -> &'static str {
        match self {
            SqliteType::Integer => "INTEGER",
            SqliteType::Text => "TEXT",
            SqliteType::Blob => "BLOB",
        }
    }

    fn for_kind(kind: &DataKind) -> Self {
        match kind {
            DataKind::Bool
            | DataKind::UInt8
            | DataKind::UInt16
            | DataKind::UInt32
            | DataKind::UInt64
            | DataKind::Int64
            | DataKind::TimestampMicros => SqliteType::Integer,
            DataKind::Uuid => SqliteType::Blob,
            DataKind::String | DataKind::Enumerated(_) | DataKind::List(_) => SqliteType::Text,
        }
    }
}

/// Declared column type: the storage class keyword followed by the kind name.
///
/// The keyword fixes the column affinity; the kind name is what loading
/// decodes with. List kinds are spelled `list_{inner}` so the declaration
/// stays a plain identifier.
fn declared_type(kind: &DataKind) -> String {
    format!("{} {}", SqliteType::for_kind(kind).as_sql_keyword(), kind_token(kind))
}

fn kind_token(kind: &DataKind) -> String {
    match kind {
        DataKind::List(inner) => format!("list_{}", kind_token(inner)),
        other => other.type_name(),
    }
}

fn parse_declared_type(declared: &str) -> Option<DataKind> {
    let token = declared.split_whitespace().nth(1)?;
    parse_kind_token(token)
}

fn parse_kind_token(token: &str) -> Option<DataKind> {
    match token.strip_prefix("list_") {
        Some(inner) => parse_kind_token(inner).map(|k| DataKind::List(Box::new(k))),
        None => DataKind::parse(token),
    }
}

/// Escape a SQL identifier (table/column name) by doubling quotes.
fn escape_identifier(name: &str) -> String {
    name.replace('"', "\"\"")
}

fn validate_slot(slot: &str) -> Result<(), StorageError> {
    let valid = !slot.is_empty()
        && !slot.to_ascii_lowercase().starts_with("sqlite_")
        && slot
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidSlotName(slot.to_string()))
    }
}

/// Saves and restores tables as named slots in one SQLite database.
///
/// Column types come from the [`ColumnTypes`] given at construction; columns
/// it does not list are typed from their first non-null value.
pub struct SqliteStorage {
    conn: Connection,
    types: ColumnTypes,
}

impl SqliteStorage {
    /// Open or create the database at `path` with the built-in column types.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let conn = Connection::open(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "opened storage");
        Ok(Self::with_connection(conn, ColumnTypes::builtin().clone()))
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self::with_connection(
            Connection::open_in_memory()?,
            ColumnTypes::builtin().clone(),
        ))
    }

    pub fn with_connection(conn: Connection, types: ColumnTypes) -> Self {
        Self { conn, types }
    }

    pub fn column_types(&self) -> &ColumnTypes {
        &self.types
    }

    pub fn slot_exists(&self, slot: &str) -> Result<bool, StorageError> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [slot],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Slot names in alphabetical order.
    pub fn list_slots(&self) -> Result<Vec<String>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    /// Persist every row of `table` under `slot`. Returns the number of rows written.
    pub fn save(&mut self, slot: &str, table: &Table, mode: SaveMode) -> Result<usize, StorageError> {
        validate_slot(slot)?;
        let exists = self.slot_exists(slot)?;
        if exists && mode == SaveMode::Create {
            return Err(StorageError::SlotExists(slot.to_string()));
        }

        let mut columns = table.columns();
        if !columns.iter().any(|c| c == PACKET_UID) {
            columns.insert(0, PACKET_UID.to_string());
        }
        let definitions: Vec<String> = columns
            .iter()
            .map(|column| {
                let kind = self.column_kind(table, column);
                let key = if column == PACKET_UID { " PRIMARY KEY" } else { "" };
                format!("\"{}\" {}{}", escape_identifier(column), declared_type(&kind), key)
            })
            .collect();

        let escaped_slot = escape_identifier(slot);
        let insert_sql = format!(
            "INSERT INTO \"{}\" ({}) VALUES ({})",
            escaped_slot,
            columns
                .iter()
                .map(|c| format!("\"{}\"", escape_identifier(c)))
                .collect::<Vec<_>>()
                .join(", "),
            vec!["?"; columns.len()].join(", ")
        );

        let tx = self.conn.transaction()?;
        if exists {
            tx.execute_batch(&format!("DROP TABLE \"{escaped_slot}\""))?;
        }
        tx.execute_batch(&format!(
            "CREATE TABLE \"{}\" ({})",
            escaped_slot,
            definitions.join(", ")
        ))?;

        {
            let mut stmt = tx.prepare(&insert_sql)?;
            for row in table.rows() {
                let values = columns
                    .iter()
                    .map(|column| row.get(column).map_or(Ok(Value::Null), encode_value))
                    .collect::<Result<Vec<_>, _>>()?;
                stmt.execute(params_from_iter(values))?;
            }
        }
        tx.commit()?;

        info!(slot, rows = table.len(), replaced = exists, "saved slot");
        Ok(table.len())
    }

    /// Restore the table saved under `slot`.
    pub fn load(&self, slot: &str) -> Result<Table, StorageError> {
        validate_slot(slot)?;
        if !self.slot_exists(slot)? {
            return Err(StorageError::SlotNotFound(slot.to_string()));
        }
        let escaped_slot = escape_identifier(slot);

        let mut info = self
            .conn
            .prepare(&format!("PRAGMA table_info(\"{escaped_slot}\")"))?;
        let columns = info
            .query_map([], |row| Ok((row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|(name, declared)| {
                parse_declared_type(&declared)
                    .map(|kind| (name.clone(), kind))
                    .ok_or_else(|| {
                        StorageError::decode(&name, format!("unknown declared type '{declared}'"))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = self
            .conn
            .prepare(&format!("SELECT * FROM \"{escaped_slot}\" ORDER BY rowid"))?;
        let mut raw_rows = stmt.query([])?;
        let mut rows = Vec::new();
        while let Some(raw) = raw_rows.next()? {
            let mut row = Row::new();
            for (index, (name, kind)) in columns.iter().enumerate() {
                let value = decode_value(name, kind, raw.get::<_, Value>(index)?)?;
                if !value.is_null() {
                    row.insert(name.clone(), value);
                }
            }
            rows.push(row);
        }

        let mut table = Table::new();
        table.append(rows)?;
        info!(slot, rows = table.len(), "loaded slot");
        Ok(table)
    }

    pub fn delete_slot(&mut self, slot: &str) -> Result<(), StorageError> {
        validate_slot(slot)?;
        if !self.slot_exists(slot)? {
            return Err(StorageError::SlotNotFound(slot.to_string()));
        }
        self.conn
            .execute_batch(&format!("DROP TABLE \"{}\"", escape_identifier(slot)))?;
        info!(slot, "deleted slot");
        Ok(())
    }

    fn column_kind(&self, table: &Table, column: &str) -> DataKind {
        self.types.get(column).cloned().unwrap_or_else(|| {
            table
                .column(column)
                .flatten()
                .find(|value| !value.is_null())
                .map(infer_kind)
                .unwrap_or(DataKind::String)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_type_round_trip() {
        let kinds = [
            DataKind::UInt16,
            DataKind::Uuid,
            DataKind::Enumerated("DnsDirection"),
            DataKind::List(Box::new(DataKind::Enumerated("DnsQType"))),
            DataKind::List(Box::new(DataKind::String)),
        ];
        for kind in kinds {
            assert_eq!(parse_declared_type(&declared_type(&kind)), Some(kind));
        }
    }

    #[test]
    fn test_declared_affinity() {
        assert_eq!(declared_type(&DataKind::UInt64), "INTEGER u64");
        assert_eq!(declared_type(&DataKind::Enumerated("DnsDirection")), "TEXT DnsDirection");
        assert_eq!(declared_type(&DataKind::Uuid), "BLOB uuid");
    }

    #[test]
    fn test_slot_name_validation() {
        assert!(validate_slot("capture_2023-02-06").is_ok());
        assert!(validate_slot("").is_err());
        assert!(validate_slot("bad name").is_err());
        assert!(validate_slot("sqlite_master").is_err());
        assert!(validate_slot("x\";DROP").is_err());
    }

    #[test]
    fn test_missing_slot() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        assert!(matches!(storage.load("nope"), Err(StorageError::SlotNotFound(_))));
        assert!(matches!(storage.delete_slot("nope"), Err(StorageError::SlotNotFound(_))));
        assert!(storage.list_slots().unwrap().is_empty());
    }
}
