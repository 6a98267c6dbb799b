//! # pcapscope-core
//!
//! Layered protocol classification and traffic analytics for offline
//! packet captures.
//!
//! This crate turns every frame of a PCAP or PCAPNG file into a
//! [`PacketRecord`] with exactly one decoded layer per level (link, network,
//! transport, application), flattens records into dot-keyed rows, and
//! derives statistics from the accumulated [`Table`]. It has no storage or
//! presentation dependencies; the `pcapscope` binary adds those.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pcapscope_core::prelude::*;
//! use std::path::Path;
//!
//! let mut classifier = Classifier::new();
//! let records = classifier.classify_file(Path::new("capture.pcap")).unwrap();
//!
//! let table = Table::from_records(&records).unwrap();
//! let base = BaseAnalyzer::new(&table);
//! println!("{} packets, {} bytes", base.packet_count(), base.total_size());
//!
//! for (domain, count) in DnsAnalyzer::new(&table).most_queried_domains(5) {
//!     println!("{domain}: {count}");
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |                        pcapscope-core                               |
//! +---------------------------------------------------------------------+
//! |  pcap/       - PCAP/PCAPNG reading                                  |
//! |  protocol/   - Protocol trait, registry, decoders, FieldValue       |
//! |  record/     - StackLevel, LayerValue, PacketRecord                 |
//! |  classify    - Per-level pipeline with diagnostics                  |
//! |  flatten     - Record to dot-keyed row                              |
//! |  table       - Append-only row collection                           |
//! |  schema/     - FieldDescriptor, DataKind, column type registry      |
//! |  analysis/   - Totals, speed series, DNS and DHCP reports           |
//! |  error       - Error types                                          |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Supported Protocols
//!
//! | Level | Protocols |
//! |-------|-----------|
//! | Link | Ethernet, Linux cooked capture (SLL) |
//! | Network | IPv4, IPv6, ARP |
//! | Transport | TCP, UDP, ICMP, ICMPv6 |
//! | Application | DNS, DHCP |

pub mod analysis;
pub mod classify;
pub mod error;
pub mod flatten;
pub mod pcap;
pub mod prelude;
pub mod protocol;
pub mod record;
pub mod schema;
pub mod table;

// Re-export commonly used types at crate root for convenience
pub use analysis::{
    nice_round, second_level_domain, speed_series, top_n, BaseAnalyzer, DhcpAnalyzer,
    DnsAnalyzer, Frequencies, SpeedSeries, TimeRange, DEFAULT_TOP_N,
};
pub use classify::{Classifier, DiagnosticEntry, Diagnostics};
pub use error::{AnalysisError, Error, PcapError, ProtocolError, Result, TableError};
pub use flatten::{flatten, nest_layer, NestedLayer, Row};
pub use pcap::{PcapFormat, PcapReader, RawPacket};
pub use protocol::{
    default_registry, BuiltinProtocol, FieldValue, ParseContext, ParseResult, Property,
    PropertyValue, Protocol, ProtocolRegistry,
};
pub use record::{LayerData, LayerFields, LayerValue, PacketRecord, StackLevel};
pub use schema::{ColumnTypes, DataKind, FieldDescriptor, ProtocolSchema};
pub use table::Table;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
