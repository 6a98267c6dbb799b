//! Field descriptor for protocol schemas.

use super::DataKind;

/// Storage-agnostic field definition.
///
/// Names are relative to a layer's `data` map; nested list records use a dotted
/// name (`answers.ttl`) matching the column the flattener produces for them.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Field name (snake_case, e.g., "src_port")
    pub name: &'static str,

    /// Data type
    pub kind: DataKind,

    /// Whether the field can be absent
    pub nullable: bool,

    /// Optional description for documentation
    pub description: Option<&'static str>,
}

impl FieldDescriptor {
    /// Create a new non-nullable field.
    pub const fn new(name: &'static str, kind: DataKind) -> Self {
        Self {
            name,
            kind,
            nullable: false,
            description: None,
        }
    }

    /// Create a new nullable field.
    pub const fn nullable(name: &'static str, kind: DataKind) -> Self {
        Self {
            name,
            kind,
            nullable: true,
            description: None,
        }
    }

    /// Add a description to the field.
    pub const fn with_description(mut self, desc: &'static str) -> Self {
        self.description = Some(desc);
        self
    }

    /// Builder: set nullability.
    pub const fn set_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }
}

/// Helpers for common field patterns.
impl FieldDescriptor {
    /// Source port field.
    pub const fn src_port() -> Self {
        Self::new("src_port", DataKind::UInt16).with_description("Source port number")
    }

    /// Destination port field.
    pub const fn dst_port() -> Self {
        Self::new("dst_port", DataKind::UInt16).with_description("Destination port number")
    }

    /// Checksum verification outcome; absent when the protocol carries no checksum.
    pub const fn checksum_valid() -> Self {
        Self::nullable("checksum_valid", DataKind::Bool)
            .with_description("Whether the recomputed checksum matches the header")
    }

    /// Address rendered as text (MAC, IPv4 or IPv6).
    pub const fn address(name: &'static str) -> Self {
        Self::new(name, DataKind::String)
    }

    /// Enumerated property field.
    pub const fn enumerated(name: &'static str, property: &'static str) -> Self {
        Self::new(name, DataKind::Enumerated(property))
    }
}
