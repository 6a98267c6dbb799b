//! Save/load round trips through the SQLite storage adapter.

mod common;

use rusqlite::Connection;
use tempfile::tempdir;

use pcapscope::storage::{SaveMode, SqliteStorage};
use pcapscope::StorageError;
use pcapscope_core::{Classifier, FieldValue, Table};

fn classified_table(dir: &std::path::Path) -> Table {
    let path = dir.join("mixed.pcap");
    common::mixed_capture(&path);
    Table::from_records(&Classifier::new().classify_file(&path).unwrap()).unwrap()
}

#[test]
fn test_round_trip_preserves_rows() {
    let dir = tempdir().unwrap();
    let table = classified_table(dir.path());
    let mut storage = SqliteStorage::open(dir.path().join("scope.db")).unwrap();

    assert_eq!(storage.save("mixed", &table, SaveMode::Create).unwrap(), 4);
    let loaded = storage.load("mixed").unwrap();

    assert_eq!(loaded, table);
    assert_eq!(loaded.columns(), table.columns());
}

#[test]
fn test_typed_columns_survive() {
    let dir = tempdir().unwrap();
    let table = classified_table(dir.path());
    let mut storage = SqliteStorage::open(dir.path().join("scope.db")).unwrap();
    storage.save("mixed", &table, SaveMode::Create).unwrap();
    let loaded = storage.load("mixed").unwrap();

    let response = &loaded.rows()[1];
    assert_eq!(
        response.get("application.DNS.data.direction").and_then(|v| v.as_enum()).map(|p| p.label()),
        Some("RESPONSE")
    );
    assert_eq!(
        response.get("transport.UDP.data.checksum_valid"),
        Some(&FieldValue::Bool(true))
    );
    assert_eq!(
        response.get("application.DNS.data.answers.rdata"),
        Some(&FieldValue::List(vec![FieldValue::string("93.184.216.34")]))
    );
    assert!(response.get("packet.uid").and_then(|v| v.as_uuid()).is_some());
}

#[test]
fn test_declared_types_in_database() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("scope.db");
    let table = classified_table(dir.path());
    SqliteStorage::open(&db)
        .unwrap()
        .save("mixed", &table, SaveMode::Create)
        .unwrap();

    let conn = Connection::open(&db).unwrap();
    let mut stmt = conn.prepare("PRAGMA table_info(\"mixed\")").unwrap();
    let declared: Vec<(String, String)> = stmt
        .query_map([], |row| Ok((row.get(1)?, row.get(2)?)))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    let type_of = |column: &str| {
        declared
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, t)| t.as_str())
    };

    assert_eq!(type_of("packet.uid"), Some("BLOB uuid"));
    assert_eq!(type_of("packet.time"), Some("INTEGER timestamp"));
    assert_eq!(type_of("application.DNS.data.direction"), Some("TEXT DnsDirection"));
    assert_eq!(type_of("transport.TCP.data.checksum_valid"), Some("INTEGER bool"));
    assert_eq!(
        type_of("application.DNS.data.answers.type"),
        Some("TEXT list_DnsQType")
    );
}

#[test]
fn test_save_modes() {
    let dir = tempdir().unwrap();
    let table = classified_table(dir.path());
    let mut storage = SqliteStorage::open(dir.path().join("scope.db")).unwrap();

    storage.save("mixed", &table, SaveMode::Create).unwrap();
    assert!(matches!(
        storage.save("mixed", &table, SaveMode::Create),
        Err(StorageError::SlotExists(_))
    ));

    storage.save("mixed", &Table::new(), SaveMode::Replace).unwrap();
    assert!(storage.load("mixed").unwrap().is_empty());
}

#[test]
fn test_slot_management() {
    let dir = tempdir().unwrap();
    let table = classified_table(dir.path());
    let mut storage = SqliteStorage::open(dir.path().join("scope.db")).unwrap();

    storage.save("tuesday", &table, SaveMode::Create).unwrap();
    storage.save("monday", &table, SaveMode::Create).unwrap();
    assert_eq!(storage.list_slots().unwrap(), vec!["monday", "tuesday"]);

    storage.delete_slot("monday").unwrap();
    assert!(!storage.slot_exists("monday").unwrap());
    assert!(matches!(storage.load("monday"), Err(StorageError::SlotNotFound(_))));
    assert!(matches!(
        storage.save("no spaces", &table, SaveMode::Create),
        Err(StorageError::InvalidSlotName(_))
    ));
}
