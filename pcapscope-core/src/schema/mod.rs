//! Schema types and the static column registry.
//!
//! Every protocol decoder describes its data fields with [`FieldDescriptor`]s.
//! [`ColumnTypes`] expands those descriptors into the full set of flattened
//! column names (`{level}.{protocol}.data.{field}`) plus the per-packet and
//! per-level bookkeeping columns, each mapped to its [`DataKind`]. The storage
//! adapter takes this map to declare and decode columns.
//!
//! # Example
//!
//! ```rust
//! use pcapscope_core::schema::{ColumnTypes, DataKind};
//!
//! let types = ColumnTypes::builtin();
//! assert_eq!(types.get("packet.uid"), Some(&DataKind::Uuid));
//! assert_eq!(
//!     types.get("application.DNS.data.direction"),
//!     Some(&DataKind::Enumerated("DnsDirection"))
//! );
//! ```

mod field;
mod kind;

use std::collections::BTreeMap;
use std::sync::OnceLock;

pub use field::FieldDescriptor;
pub use kind::DataKind;

use crate::protocol::{default_registry, Protocol, ProtocolRegistry};
use crate::record::StackLevel;

/// A protocol's complete schema.
pub type ProtocolSchema = Vec<FieldDescriptor>;

/// Column name of the packet primary key.
pub const PACKET_UID: &str = "packet.uid";
/// Column name of the capture timestamp.
pub const PACKET_TIME: &str = "packet.time";
/// Column name of the frame size in bytes.
pub const PACKET_SIZE: &str = "packet.size";
/// Column name of the per-capture sequence number.
pub const PACKET_NUMBER: &str = "packet.number";

/// Column holding the protocol name decoded at `level`.
pub fn layer_name_column(level: StackLevel) -> String {
    format!("{}.layer_name", level.as_str())
}

/// Column holding a field of a protocol's data map at `level`.
pub fn data_column(level: StackLevel, protocol: &str, field: &str) -> String {
    format!("{}.{}.data.{}", level.as_str(), protocol, field)
}

/// Mapping from flattened column name to declared type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnTypes {
    columns: BTreeMap<String, DataKind>,
}

impl ColumnTypes {
    /// Build the column map for every protocol in `registry`.
    pub fn from_registry(registry: &ProtocolRegistry) -> Self {
        let mut columns = BTreeMap::new();

        columns.insert(PACKET_UID.to_string(), DataKind::Uuid);
        columns.insert(PACKET_TIME.to_string(), DataKind::TimestampMicros);
        columns.insert(PACKET_SIZE.to_string(), DataKind::UInt64);
        columns.insert(PACKET_NUMBER.to_string(), DataKind::UInt64);

        for level in StackLevel::ALL {
            columns.insert(layer_name_column(level), DataKind::String);
            columns.insert(format!("{}.size_total", level.as_str()), DataKind::UInt64);
            columns.insert(format!("{}.size_payload", level.as_str()), DataKind::UInt64);

            for parser in registry.parsers(level) {
                for field in parser.schema_fields() {
                    columns.insert(data_column(level, parser.name(), field.name), field.kind);
                }
            }
        }

        Self { columns }
    }

    /// The column map for the built-in registry, built once per process.
    pub fn builtin() -> &'static ColumnTypes {
        static BUILTIN: OnceLock<ColumnTypes> = OnceLock::new();
        BUILTIN.get_or_init(|| ColumnTypes::from_registry(&default_registry()))
    }

    /// Declared type of a column.
    pub fn get(&self, column: &str) -> Option<&DataKind> {
        self.columns.get(column)
    }

    /// Register or override a column type.
    pub fn insert(&mut self, column: impl Into<String>, kind: DataKind) {
        self.columns.insert(column.into(), kind);
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DataKind)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }
}
