//! Convenient re-exports for common usage.
//!
//! # Example
//!
//! ```rust
//! use pcapscope_core::prelude::*;
//!
//! let registry = default_registry();
//! assert_eq!(registry.len(), 11);
//! ```

// Classification and records
pub use crate::classify::{Classifier, Diagnostics};
pub use crate::record::{LayerData, LayerValue, PacketRecord, StackLevel};

// Protocol types
pub use crate::protocol::{
    default_registry, FieldValue, ParseContext, ParseResult, Protocol, ProtocolRegistry,
};

// Tables and analytics
pub use crate::analysis::{BaseAnalyzer, DhcpAnalyzer, DnsAnalyzer, SpeedSeries};
pub use crate::flatten::Row;
pub use crate::table::Table;

// I/O types
pub use crate::pcap::{PcapReader, RawPacket};

// Error types
pub use crate::error::{Error, Result};
