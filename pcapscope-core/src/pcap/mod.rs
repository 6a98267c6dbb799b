//! Capture file reading.
//!
//! The main types are:
//! - [`PcapReader`] - Reader over legacy PCAP and PCAPNG captures
//! - [`RawPacket`] - One captured frame with its metadata

mod reader;

use bytes::Bytes;
use chrono::{DateTime, Utc};

pub use reader::{PcapFormat, PcapReader};

/// A raw packet from a capture file.
#[derive(Debug, Clone)]
pub struct RawPacket {
    /// Frame number (1-indexed).
    pub frame_number: u64,

    /// Timestamp in microseconds since epoch.
    pub timestamp_us: i64,

    /// Captured length (may be less than original).
    pub captured_length: u32,

    /// Original length on the wire.
    pub original_length: u32,

    /// Link layer type (e.g., 1 = Ethernet).
    pub link_type: u16,

    /// Raw packet data.
    pub data: Bytes,
}

impl RawPacket {
    /// Create a new raw packet.
    pub fn new(
        frame_number: u64,
        timestamp_us: i64,
        captured_length: u32,
        original_length: u32,
        link_type: u16,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            frame_number,
            timestamp_us,
            captured_length,
            original_length,
            link_type,
            data: data.into(),
        }
    }

    /// Check if the packet was truncated during capture.
    pub fn is_truncated(&self) -> bool {
        self.captured_length < self.original_length
    }

    /// Capture timestamp; out-of-range values clamp to the epoch.
    pub fn time(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_micros(self.timestamp_us).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_packet_time() {
        let packet = RawPacket::new(1, 1_500_000, 60, 60, 1, vec![0u8; 60]);
        assert_eq!(packet.time().timestamp(), 1);
        assert_eq!(packet.time().timestamp_subsec_micros(), 500_000);
        assert!(!packet.is_truncated());
    }

    #[test]
    fn test_truncated() {
        let packet = RawPacket::new(1, 0, 64, 1500, 1, vec![0u8; 64]);
        assert!(packet.is_truncated());
    }
}
