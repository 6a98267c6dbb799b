//! Field value types for decoded layers and flattened rows.
//!
//! A [`FieldValue`] owns its data: decoded layers outlive the capture buffer
//! they came from, and flattened rows are persisted and reloaded. Strings use
//! `CompactString`, so short values (ports rendered as text, MAC addresses,
//! most domain names) stay inline.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use chrono::{DateTime, Utc};
use compact_str::CompactString;
use uuid::Uuid;

use super::PropertyValue;

/// Possible field value types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Unsigned 8-bit integer
    UInt8(u8),
    /// Unsigned 16-bit integer
    UInt16(u16),
    /// Unsigned 32-bit integer
    UInt32(u32),
    /// Unsigned 64-bit integer
    UInt64(u64),
    /// Signed 64-bit integer
    Int64(i64),
    /// Boolean value
    Bool(bool),
    /// Text (addresses, names, joined option lists)
    String(CompactString),
    /// Enumerated property member
    Enum(PropertyValue),
    /// Unique identifier
    Uuid(Uuid),
    /// Capture timestamp
    Timestamp(DateTime<Utc>),
    /// List of values (scalars or records)
    List(Vec<FieldValue>),
    /// Ordered nested record (e.g. one DNS answer)
    Record(Vec<(CompactString, FieldValue)>),
    /// Null/missing value
    Null,
}

impl FieldValue {
    /// Text value.
    pub fn string(value: impl Into<CompactString>) -> Self {
        FieldValue::String(value.into())
    }

    /// Optional value, `Null` when absent.
    pub fn optional<T: Into<FieldValue>>(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }

    /// Create a MAC address string from bytes.
    pub fn mac(bytes: &[u8]) -> Self {
        if bytes.len() >= 6 {
            FieldValue::String(format_hw_addr(&bytes[..6]).into())
        } else {
            FieldValue::Null
        }
    }

    /// Create an IPv4 address string from bytes.
    pub fn ipv4(bytes: &[u8]) -> Self {
        if bytes.len() >= 4 {
            FieldValue::string(Ipv4Addr::new(bytes[0], bytes[1], bytes[2], bytes[3]).to_string())
        } else {
            FieldValue::Null
        }
    }

    /// Create an IPv6 address string from bytes.
    pub fn ipv6(bytes: &[u8]) -> Self {
        if bytes.len() >= 16 {
            let mut arr = [0u8; 16];
            arr.copy_from_slice(&bytes[..16]);
            FieldValue::string(Ipv6Addr::from(arr).to_string())
        } else {
            FieldValue::Null
        }
    }

    /// Check if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Try to get as u64.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            FieldValue::UInt8(v) => Some(*v as u64),
            FieldValue::UInt16(v) => Some(*v as u64),
            FieldValue::UInt32(v) => Some(*v as u64),
            FieldValue::UInt64(v) => Some(*v),
            FieldValue::Int64(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Try to get as i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int64(v) => Some(*v),
            FieldValue::UInt8(v) => Some(*v as i64),
            FieldValue::UInt16(v) => Some(*v as i64),
            FieldValue::UInt32(v) => Some(*v as i64),
            FieldValue::UInt64(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as str reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Try to get as an enumerated property.
    pub fn as_enum(&self) -> Option<&PropertyValue> {
        match self {
            FieldValue::Enum(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            FieldValue::Uuid(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Timestamp(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as list reference.
    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Try to get as record reference.
    pub fn as_record(&self) -> Option<&[(CompactString, FieldValue)]> {
        match self {
            FieldValue::Record(entries) => Some(entries.as_slice()),
            _ => None,
        }
    }

    /// Grouping key text: the value as displayed, without list brackets for scalars.
    pub fn as_string(&self) -> Option<String> {
        match self {
            FieldValue::Null | FieldValue::List(_) | FieldValue::Record(_) => None,
            other => Some(other.to_string()),
        }
    }
}

/// Format a hardware address of any length as colon-separated lowercase hex.
pub fn format_hw_addr(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(':');
        }
        out.push_str(&format!("{b:02x}"));
    }
    out
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::UInt8(v) => write!(f, "{v}"),
            FieldValue::UInt16(v) => write!(f, "{v}"),
            FieldValue::UInt32(v) => write!(f, "{v}"),
            FieldValue::UInt64(v) => write!(f, "{v}"),
            FieldValue::Int64(v) => write!(f, "{v}"),
            FieldValue::Bool(v) => write!(f, "{v}"),
            FieldValue::String(s) => write!(f, "{s}"),
            FieldValue::Enum(v) => write!(f, "{v}"),
            FieldValue::Uuid(v) => write!(f, "{v}"),
            FieldValue::Timestamp(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S%.6f")),
            FieldValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            FieldValue::Record(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
            FieldValue::Null => write!(f, "NULL"),
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::$variant(value)
                }
            }
        )*
    };
}

impl_from! {
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    i64 => Int64,
    bool => Bool,
    CompactString => String,
    PropertyValue => Enum,
    Uuid => Uuid,
    DateTime<Utc> => Timestamp,
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.into())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::DnsDirection;

    #[test]
    fn test_compact_string_inline() {
        // CompactString stores small strings inline (no heap alloc)
        let small = CompactString::new("example.com");
        assert!(!small.is_heap_allocated());
    }

    #[test]
    fn test_address_helpers() {
        assert_eq!(
            FieldValue::mac(&[0xaa, 0xbb, 0xcc, 0x00, 0x11, 0x22]),
            FieldValue::string("aa:bb:cc:00:11:22")
        );
        assert_eq!(FieldValue::ipv4(&[10, 0, 0, 1]), FieldValue::string("10.0.0.1"));
        assert_eq!(FieldValue::mac(&[1, 2]), FieldValue::Null);
        let mut v6 = [0u8; 16];
        v6[15] = 1;
        assert_eq!(FieldValue::ipv6(&v6), FieldValue::string("::1"));
    }

    #[test]
    fn test_format_hw_addr_any_length() {
        assert_eq!(format_hw_addr(&[0x21, 0x6a, 0x2d]), "21:6a:2d");
        assert_eq!(format_hw_addr(&[]), "");
    }

    #[test]
    fn test_optional() {
        assert_eq!(FieldValue::optional(Some(5u16)), FieldValue::UInt16(5));
        assert_eq!(FieldValue::optional::<u16>(None), FieldValue::Null);
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldValue::UInt16(443).to_string(), "443");
        assert_eq!(FieldValue::from(DnsDirection::Query).to_string(), "QUERY");
        let list = FieldValue::List(vec![FieldValue::UInt8(1), FieldValue::Null]);
        assert_eq!(list.to_string(), "[1, NULL]");
        assert_eq!(list.as_string(), None);
    }

    #[test]
    fn test_numeric_accessors() {
        assert_eq!(FieldValue::UInt32(7).as_u64(), Some(7));
        assert_eq!(FieldValue::Int64(-1).as_u64(), None);
        assert_eq!(FieldValue::UInt64(u64::MAX).as_i64(), None);
        assert_eq!(FieldValue::Bool(true).as_bool(), Some(true));
    }
}
