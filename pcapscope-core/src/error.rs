//! Error types for pcapscope-core.
//!
//! This module provides structured error types for all pcapscope-core operations:
//!
//! - [`enum@Error`] - Main error enum that wraps all error types
//! - [`PcapError`] - Errors from capture file reading
//! - [`ProtocolError`] - Errors from protocol decoding
//! - [`AnalysisError`] - Rejected analytics input
//! - [`TableError`] - Violations of the table's primary key
//!
//! Protocol errors never escape classification: the classifier turns them into
//! Raw layers and diagnostic log entries. They surface only from direct decoder calls.

use thiserror::Error;
use uuid::Uuid;

/// Main error type for pcapscope-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Error reading or parsing a capture file
    #[error("PCAP error: {0}")]
    Pcap(#[from] PcapError),

    /// Error during protocol decoding
    #[error("Protocol parse error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Rejected analytics input
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// Table constraint violation
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to capture file reading.
#[derive(Error, Debug)]
pub enum PcapError {
    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Invalid PCAP format
    #[error("Invalid PCAP format: {reason}")]
    InvalidFormat { reason: String },

    /// The file ends inside a record
    #[error("Capture truncated after frame {frame}")]
    TruncatedPacket { frame: u64 },
}

/// Errors related to protocol decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Packet too short for protocol header
    #[error("{protocol}: packet too short (need {needed} bytes, have {have})")]
    PacketTooShort {
        protocol: &'static str,
        needed: usize,
        have: usize,
    },

    /// Invalid header field value
    #[error("{protocol}: invalid {field}: {reason}")]
    InvalidField {
        protocol: &'static str,
        field: &'static str,
        reason: String,
    },
}

/// Errors raised by the analytics components.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Nice rounding only accepts non-negative input
    #[error("cannot round negative interval {0}")]
    NegativeInterval(f64),

    /// NaN or infinite interval
    #[error("invalid interval {0}")]
    InvalidInterval(f64),
}

/// Errors raised by [`Table`](crate::table::Table) mutations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// A row with the same `packet.uid` is already present
    #[error("duplicate packet uid {0}")]
    DuplicateUid(Uuid),

    /// Row lacks the `packet.uid` primary key
    #[error("row has no packet.uid")]
    MissingUid,
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
