//! Flattening packet records into columnar rows.
//!
//! Column names are dot-joined paths: `packet.*` for frame metadata,
//! `{level}.layer_name` / `{level}.size_total` / `{level}.size_payload` per
//! level, and `{level}.{protocol}.data.{field}` for decoded fields.
//!
//! Nested records flatten by extending the path. A list of records becomes
//! one list-valued column per key seen in any element, each holding the
//! per-element values in order (`Null` where an element lacks the key). A list
//! of scalars stays a single list-valued column. Elements are matched by key
//! only, never by position, so heterogeneous records align on shared keys.
//! Null scalars are omitted from the row.

use std::collections::BTreeMap;

use compact_str::CompactString;

use crate::protocol::FieldValue;
use crate::record::{PacketRecord, StackLevel};
use crate::schema::{
    data_column, layer_name_column, PACKET_NUMBER, PACKET_SIZE, PACKET_TIME, PACKET_UID,
};

/// One flattened packet record, keyed by column name.
pub type Row = BTreeMap<String, FieldValue>;

/// Flatten a packet record into a row.
pub fn flatten(record: &PacketRecord) -> Row {
    let mut row = Row::new();

    row.insert(PACKET_UID.to_string(), FieldValue::Uuid(record.uid));
    row.insert(PACKET_TIME.to_string(), FieldValue::Timestamp(record.time));
    row.insert(PACKET_SIZE.to_string(), FieldValue::UInt64(record.size as u64));
    row.insert(PACKET_NUMBER.to_string(), FieldValue::UInt64(record.number));

    for layer in record.layers() {
        let level = layer.level();
        row.insert(layer_name_column(level), layer.protocol_name().into());
        row.insert(size_total_column(level), FieldValue::UInt64(layer.size_total() as u64));
        row.insert(size_payload_column(level), FieldValue::UInt64(layer.size_payload() as u64));

        for (field, value) in layer.data().fields() {
            let path = data_column(level, layer.protocol_name(), field);
            flatten_value(&mut row, path, value);
        }
    }

    row
}

fn size_total_column(level: StackLevel) -> String {
    format!("{}.size_total", level.as_str())
}

fn size_payload_column(level: StackLevel) -> String {
    format!("{}.size_payload", level.as_str())
}

fn flatten_value(row: &mut Row, path: String, value: FieldValue) {
    match value {
        FieldValue::Null => {}
        FieldValue::Record(entries) => {
            for (key, value) in entries {
                flatten_value(row, format!("{path}.{key}"), value);
            }
        }
        FieldValue::List(items) if items.iter().any(|i| matches!(i, FieldValue::Record(_))) => {
            flatten_record_list(row, &path, items);
        }
        other => {
            row.insert(path, other);
        }
    }
}

/// Union-of-keys flattening for a list whose elements are records.
///
/// Scalar elements mixed into such a list keep their own column at `path`.
fn flatten_record_list(row: &mut Row, path: &str, items: Vec<FieldValue>) {
    let mut keys: Vec<CompactString> = Vec::new();
    for item in &items {
        if let FieldValue::Record(entries) = item {
            for (key, _) in entries {
                if !keys.contains(key) {
                    keys.push(key.clone());
                }
            }
        }
    }

    let mut columns: Vec<Vec<FieldValue>> = vec![Vec::new(); keys.len()];
    let mut scalars = Vec::new();

    for item in items {
        match item {
            FieldValue::Record(entries) => {
                for (key, column) in keys.iter().zip(columns.iter_mut()) {
                    let value = entries
                        .iter()
                        .find(|(k, _)| k == key)
                        .map(|(_, v)| v.clone())
                        .unwrap_or(FieldValue::Null);
                    column.push(value);
                }
            }
            scalar => scalars.push(scalar),
        }
    }

    for (key, values) in keys.into_iter().zip(columns) {
        row.insert(format!("{path}.{key}"), FieldValue::List(values));
    }
    if !scalars.is_empty() {
        row.insert(path.to_string(), FieldValue::List(scalars));
    }
}

/// Scalar view of one level reconstructed from a flattened row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedLayer {
    pub protocol: String,
    pub size_total: u64,
    pub size_payload: u64,
    /// Data fields by name; list-valued columns are not included.
    pub data: BTreeMap<String, FieldValue>,
}

/// Rebuild the protocol name, sizes and scalar data map of one level.
///
/// Returns `None` when the row carries no layer at that level.
pub fn nest_layer(row: &Row, level: StackLevel) -> Option<NestedLayer> {
    let protocol = row.get(&layer_name_column(level))?.as_str()?.to_string();
    let size = |column: String| row.get(&column).and_then(FieldValue::as_u64).unwrap_or(0);

    let prefix = format!("{}.{}.data.", level.as_str(), protocol);
    let data = row
        .range(prefix.clone()..)
        .take_while(|(column, _)| column.starts_with(&prefix))
        .filter(|(_, value)| !matches!(value, FieldValue::List(_)))
        .map(|(column, value)| (column[prefix.len()..].to_string(), value.clone()))
        .collect();

    Some(NestedLayer {
        size_total: size(size_total_column(level)),
        size_payload: size(size_payload_column(level)),
        protocol,
        data,
    })
}
