//! The analysis table: flattened rows accumulated across captures.

use std::collections::{BTreeSet, HashSet};

use uuid::Uuid;

use crate::error::TableError;
use crate::flatten::{flatten, Row};
use crate::protocol::FieldValue;
use crate::record::PacketRecord;
use crate::schema::PACKET_UID;

/// Append-only collection of flattened rows keyed by `packet.uid`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<Row>,
    uids: HashSet<Uuid>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from classified records, under the same uid checks as
    /// [`append`](Self::append).
    pub fn from_records<'a>(
        records: impl IntoIterator<Item = &'a PacketRecord>,
    ) -> Result<Self, TableError> {
        let mut table = Self::new();
        table.append(records.into_iter().map(flatten).collect())?;
        Ok(table)
    }

    /// Append rows. The batch is rejected as a whole if any row lacks a
    /// `packet.uid` or repeats one already present.
    pub fn append(&mut self, rows: Vec<Row>) -> Result<(), TableError> {
        let mut incoming = HashSet::with_capacity(rows.len());
        for row in &rows {
            let uid = row_uid(row).ok_or(TableError::MissingUid)?;
            if self.uids.contains(&uid) || !incoming.insert(uid) {
                return Err(TableError::DuplicateUid(uid));
            }
        }

        self.uids.extend(incoming);
        self.rows.extend(rows);
        Ok(())
    }

    /// Append another table's rows.
    pub fn extend(&mut self, other: Table) -> Result<(), TableError> {
        self.append(other.rows)
    }

    /// Drop every row.
    pub fn reset(&mut self) {
        self.rows.clear();
        self.uids.clear();
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    pub fn contains_uid(&self, uid: &Uuid) -> bool {
        self.uids.contains(uid)
    }

    /// Every column present in at least one row, sorted by name.
    pub fn columns(&self) -> Vec<String> {
        self.rows
            .iter()
            .flat_map(|row| row.keys())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Values of one column in row order; `None` where a row lacks it.
    pub fn column<'a>(&'a self, name: &'a str) -> impl Iterator<Item = Option<&'a FieldValue>> + 'a {
        self.rows.iter().map(move |row| row.get(name))
    }
}

fn row_uid(row: &Row) -> Option<Uuid> {
    row.get(PACKET_UID).and_then(FieldValue::as_uuid)
}
