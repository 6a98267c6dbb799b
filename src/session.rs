//! Analysis session: one table fed by captures and backed by storage.

use std::io;
use std::path::Path;

use tracing::info;

use pcapscope_core::{Classifier, Diagnostics, Table};

use crate::error::{Result, StorageError};
use crate::storage::{SaveMode, SqliteStorage};

/// Accumulates classified captures into a single [`Table`] and moves it
/// to and from storage slots.
pub struct Session {
    classifier: Classifier,
    table: Table,
    storage: SqliteStorage,
}

impl Session {
    pub fn new(storage: SqliteStorage) -> Self {
        Self {
            classifier: Classifier::new(),
            table: Table::new(),
            storage,
        }
    }

    /// Open a session over the database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> std::result::Result<Self, StorageError> {
        Ok(Self::new(SqliteStorage::open(path)?))
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Diagnostics collected since the last [`write_diagnostics`](Self::write_diagnostics).
    pub fn diagnostics(&self) -> &Diagnostics {
        self.classifier.diagnostics()
    }

    /// Classify a capture file and append its packets. Returns the number of
    /// packets added.
    pub fn load_capture(&mut self, path: &Path) -> Result<usize> {
        let records = self.classifier.classify_file(path)?;
        let loaded = Table::from_records(&records)?;
        let count = loaded.len();
        self.table.extend(loaded)?;
        info!(path = %path.display(), packets = count, total = self.table.len(), "capture added");
        Ok(count)
    }

    /// Drop every row.
    pub fn reset(&mut self) {
        self.table.reset();
    }

    pub fn save(&mut self, slot: &str, mode: SaveMode) -> std::result::Result<usize, StorageError> {
        self.storage.save(slot, &self.table, mode)
    }

    /// Replace the current table with the one saved under `slot`.
    pub fn load(&mut self, slot: &str) -> std::result::Result<usize, StorageError> {
        self.table = self.storage.load(slot)?;
        Ok(self.table.len())
    }

    pub fn list_slots(&self) -> std::result::Result<Vec<String>, StorageError> {
        self.storage.list_slots()
    }

    pub fn delete_slot(&mut self, slot: &str) -> std::result::Result<(), StorageError> {
        self.storage.delete_slot(slot)
    }

    pub fn slot_exists(&self, slot: &str) -> std::result::Result<bool, StorageError> {
        self.storage.slot_exists(slot)
    }

    /// Write the three diagnostic logs to `dir` and clear them.
    pub fn write_diagnostics(&mut self, dir: &Path) -> io::Result<()> {
        let diagnostics = self.classifier.take_diagnostics();
        diagnostics.write_to(dir)?;
        info!(
            dir = %dir.display(),
            unsupported = diagnostics.unsupported().len(),
            errors = diagnostics.errors().len(),
            checksum = diagnostics.checksum_mismatches().len(),
            "diagnostics written"
        );
        Ok(())
    }
}
