//! Conversions between [`FieldValue`] and SQLite values.
//!
//! | Kind | Stored as |
//! |------|-----------|
//! | integers | INTEGER (u64 keeps its bit pattern) |
//! | bool | INTEGER 0/1 |
//! | string | TEXT |
//! | binary, uuid | BLOB |
//! | enumerated | TEXT member label |
//! | timestamp | INTEGER microseconds since the epoch |
//! | list | TEXT, JSON array |

use chrono::DateTime;
use rusqlite::types::Value;
use serde_json::{json, Map, Value as Json};
use uuid::Uuid;

use pcapscope_core::protocol::PropertyValue;
use pcapscope_core::schema::DataKind;
use pcapscope_core::FieldValue;

use crate::error::StorageError;

/// Encode a row value for insertion.
pub fn encode_value(value: &FieldValue) -> Result<Value, StorageError> {
    let encoded = match value {
        FieldValue::UInt8(v) => Value::Integer(i64::from(*v)),
        FieldValue::UInt16(v) => Value::Integer(i64::from(*v)),
        FieldValue::UInt32(v) => Value::Integer(i64::from(*v)),
        FieldValue::UInt64(v) => Value::Integer(*v as i64),
        FieldValue::Int64(v) => Value::Integer(*v),
        FieldValue::Bool(v) => Value::Integer(i64::from(*v)),
        FieldValue::String(s) => Value::Text(s.to_string()),
        FieldValue::Enum(p) => Value::Text(p.label().to_string()),
        FieldValue::Uuid(u) => Value::Blob(u.as_bytes().to_vec()),
        FieldValue::Timestamp(t) => Value::Integer(t.timestamp_micros()),
        FieldValue::List(_) | FieldValue::Record(_) => {
            Value::Text(serde_json::to_string(&to_json(value))?)
        }
        FieldValue::Null => Value::Null,
    };
    Ok(encoded)
}

fn to_json(value: &FieldValue) -> Json {
    match value {
        FieldValue::UInt8(v) => json!(v),
        FieldValue::UInt16(v) => json!(v),
        FieldValue::UInt32(v) => json!(v),
        FieldValue::UInt64(v) => json!(v),
        FieldValue::Int64(v) => json!(v),
        FieldValue::Bool(v) => Json::Bool(*v),
        FieldValue::String(s) => Json::String(s.to_string()),
        FieldValue::Enum(p) => Json::String(p.label().to_string()),
        FieldValue::Uuid(u) => Json::String(u.to_string()),
        FieldValue::Timestamp(t) => json!(t.timestamp_micros()),
        FieldValue::List(items) => Json::Array(items.iter().map(to_json).collect()),
        FieldValue::Record(entries) => Json::Object(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), to_json(v)))
                .collect::<Map<_, _>>(),
        ),
        FieldValue::Null => Json::Null,
    }
}

/// Decode a stored value according to its column's declared kind.
pub fn decode_value(column: &str, kind: &DataKind, value: Value) -> Result<FieldValue, StorageError> {
    let mismatch = |value: &Value| {
        StorageError::decode(column, format!("{:?} is not a valid {kind}", value.data_type()))
    };

    let decoded = match (kind, value) {
        (_, Value::Null) => FieldValue::Null,
        (DataKind::Bool, Value::Integer(i)) => FieldValue::Bool(i != 0),
        (DataKind::UInt8, Value::Integer(i)) => FieldValue::UInt8(narrow(column, i)?),
        (DataKind::UInt16, Value::Integer(i)) => FieldValue::UInt16(narrow(column, i)?),
        (DataKind::UInt32, Value::Integer(i)) => FieldValue::UInt32(narrow(column, i)?),
        (DataKind::UInt64, Value::Integer(i)) => FieldValue::UInt64(i as u64),
        (DataKind::Int64, Value::Integer(i)) => FieldValue::Int64(i),
        (DataKind::String, Value::Text(s)) => FieldValue::string(s),
        (DataKind::Enumerated(property), Value::Text(label)) => {
            FieldValue::Enum(resolve(column, property, &label)?)
        }
        (DataKind::Uuid, Value::Blob(b)) => FieldValue::Uuid(
            Uuid::from_slice(&b).map_err(|e| StorageError::decode(column, e.to_string()))?,
        ),
        (DataKind::TimestampMicros, Value::Integer(us)) => FieldValue::Timestamp(timestamp(column, us)?),
        (DataKind::List(inner), Value::Text(text)) => match serde_json::from_str(&text)? {
            Json::Array(items) => FieldValue::List(
                items
                    .into_iter()
                    .map(|item| from_json(column, inner, item))
                    .collect::<Result<_, _>>()?,
            ),
            _ => return Err(StorageError::decode(column, "expected a JSON array")),
        },
        (_, other) => return Err(mismatch(&other)),
    };
    Ok(decoded)
}

fn from_json(column: &str, kind: &DataKind, value: Json) -> Result<FieldValue, StorageError> {
    let decoded = match (kind, value) {
        (_, Json::Null) => FieldValue::Null,
        (DataKind::Bool, Json::Bool(b)) => FieldValue::Bool(b),
        (DataKind::UInt8, Json::Number(n)) => FieldValue::UInt8(json_uint(column, &n)?),
        (DataKind::UInt16, Json::Number(n)) => FieldValue::UInt16(json_uint(column, &n)?),
        (DataKind::UInt32, Json::Number(n)) => FieldValue::UInt32(json_uint(column, &n)?),
        (DataKind::UInt64, Json::Number(n)) => FieldValue::UInt64(json_uint(column, &n)?),
        (DataKind::Int64, Json::Number(n)) => FieldValue::Int64(
            n.as_i64()
                .ok_or_else(|| StorageError::decode(column, format!("{n} is not an i64")))?,
        ),
        (DataKind::TimestampMicros, Json::Number(n)) => {
            let us = n
                .as_i64()
                .ok_or_else(|| StorageError::decode(column, format!("{n} is not a timestamp")))?;
            FieldValue::Timestamp(timestamp(column, us)?)
        }
        (DataKind::String, Json::String(s)) => FieldValue::string(s),
        (DataKind::Enumerated(property), Json::String(label)) => {
            FieldValue::Enum(resolve(column, property, &label)?)
        }
        (DataKind::Uuid, Json::String(s)) => FieldValue::Uuid(
            Uuid::parse_str(&s).map_err(|e| StorageError::decode(column, e.to_string()))?,
        ),
        (DataKind::List(inner), Json::Array(items)) => FieldValue::List(
            items
                .into_iter()
                .map(|item| from_json(column, inner, item))
                .collect::<Result<_, _>>()?,
        ),
        (kind, other) => {
            return Err(StorageError::decode(
                column,
                format!("list element {other} is not a valid {kind}"),
            ))
        }
    };
    Ok(decoded)
}

fn narrow<T: TryFrom<i64>>(column: &str, value: i64) -> Result<T, StorageError> {
    T::try_from(value).map_err(|_| StorageError::decode(column, format!("{value} out of range")))
}

fn json_uint<T: TryFrom<u64>>(column: &str, n: &serde_json::Number) -> Result<T, StorageError> {
    n.as_u64()
        .and_then(|v| T::try_from(v).ok())
        .ok_or_else(|| StorageError::decode(column, format!("{n} out of range")))
}

fn resolve(column: &str, property: &str, label: &str) -> Result<PropertyValue, StorageError> {
    PropertyValue::resolve(property, label)
        .ok_or_else(|| StorageError::decode(column, format!("'{label}' is not a {property}")))
}

fn timestamp(column: &str, us: i64) -> Result<chrono::DateTime<chrono::Utc>, StorageError> {
    DateTime::from_timestamp_micros(us)
        .ok_or_else(|| StorageError::decode(column, format!("timestamp {us} out of range")))
}

/// Declared kind for a column the static registry does not know.
pub fn infer_kind(value: &FieldValue) -> DataKind {
    match value {
        FieldValue::UInt8(_) => DataKind::UInt8,
        FieldValue::UInt16(_) => DataKind::UInt16,
        FieldValue::UInt32(_) => DataKind::UInt32,
        FieldValue::UInt64(_) => DataKind::UInt64,
        FieldValue::Int64(_) => DataKind::Int64,
        FieldValue::Bool(_) => DataKind::Bool,
        FieldValue::Enum(p) => DataKind::Enumerated(p.property()),
        FieldValue::Uuid(_) => DataKind::Uuid,
        FieldValue::Timestamp(_) => DataKind::TimestampMicros,
        FieldValue::List(items) => {
            let inner = items
                .iter()
                .find(|item| !item.is_null())
                .map(infer_kind)
                .unwrap_or(DataKind::String);
            DataKind::List(Box::new(inner))
        }
        FieldValue::String(_) | FieldValue::Record(_) | FieldValue::Null => DataKind::String,
    }
}
