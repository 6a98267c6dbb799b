//! Storage-agnostic data type definitions.

/// Data types a flattened column can carry.
///
/// These map to declared column types in the storage adapter; the
/// [`type_name`](DataKind::type_name) is what gets written as the declared
/// type so a loaded slot can be decoded without any side tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataKind {
    /// Boolean (true/false)
    Bool,

    /// Unsigned 8-bit integer
    UInt8,

    /// Unsigned 16-bit integer
    UInt16,

    /// Unsigned 32-bit integer
    UInt32,

    /// Unsigned 64-bit integer
    UInt64,

    /// Signed 64-bit integer
    Int64,

    /// UTF-8 string
    String,

    /// Enumerated property, identified by its type name (e.g. `"DnsDirection"`)
    Enumerated(&'static str),

    /// 128-bit unique identifier
    Uuid,

    /// Timestamp with microsecond precision (UTC)
    TimestampMicros,

    /// Variable-length list of elements of the same type
    List(Box<DataKind>),
}

impl DataKind {
    /// Type name for display and for declared storage types.
    pub fn type_name(&self) -> String {
        match self {
            DataKind::Bool => "bool".to_string(),
            DataKind::UInt8 => "u8".to_string(),
            DataKind::UInt16 => "u16".to_string(),
            DataKind::UInt32 => "u32".to_string(),
            DataKind::UInt64 => "u64".to_string(),
            DataKind::Int64 => "i64".to_string(),
            DataKind::String => "string".to_string(),
            DataKind::Enumerated(name) => (*name).to_string(),
            DataKind::Uuid => "uuid".to_string(),
            DataKind::TimestampMicros => "timestamp".to_string(),
            DataKind::List(inner) => format!("list<{}>", inner.type_name()),
        }
    }

    /// Parse a name produced by [`type_name`](DataKind::type_name).
    ///
    /// Enumerated names are resolved against the known property types, so an
    /// unrecognized name yields `None`.
    pub fn parse(name: &str) -> Option<DataKind> {
        let kind = match name {
            "bool" => DataKind::Bool,
            "u8" => DataKind::UInt8,
            "u16" => DataKind::UInt16,
            "u32" => DataKind::UInt32,
            "u64" => DataKind::UInt64,
            "i64" => DataKind::Int64,
            "string" => DataKind::String,
            "uuid" => DataKind::Uuid,
            "timestamp" => DataKind::TimestampMicros,
            other => {
                if let Some(inner) = other.strip_prefix("list<").and_then(|s| s.strip_suffix('>')) {
                    return DataKind::parse(inner).map(|k| DataKind::List(Box::new(k)));
                }
                return crate::protocol::property_type_name(other).map(DataKind::Enumerated);
            }
        };
        Some(kind)
    }

    /// Size in bytes for fixed-width types, None for variable-width.
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            DataKind::Bool => Some(1),
            DataKind::UInt8 => Some(1),
            DataKind::UInt16 => Some(2),
            DataKind::UInt32 => Some(4),
            DataKind::UInt64 => Some(8),
            DataKind::Int64 => Some(8),
            DataKind::TimestampMicros => Some(8),
            DataKind::Uuid => Some(16),
            DataKind::String | DataKind::Enumerated(_) | DataKind::List(_) => None,
        }
    }

    /// Get the inner type for List, or None if not a List.
    pub fn list_inner(&self) -> Option<&DataKind> {
        match self {
            DataKind::List(inner) => Some(inner),
            _ => None,
        }
    }
}

impl std::fmt::Display for DataKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.type_name())
    }
}
