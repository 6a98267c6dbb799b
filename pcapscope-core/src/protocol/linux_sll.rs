//! Linux SLL (Sockaddr Link Layer) protocol parser.
//!
//! Parses Linux cooked capture headers (LINKTYPE_LINUX_SLL = 113).
//! This format is used when capturing on the "any" interface or for
//! protocols that don't have a native link-layer header.

use super::ethernet::ethertype;
use super::{format_hw_addr, FieldValue, ParseContext, ParseResult, Protocol};
use crate::error::ProtocolError;
use crate::record::{LayerData, LayerFields, StackLevel};
use crate::schema::FieldDescriptor;

/// PCAP link type for Linux SLL captures.
pub const LINKTYPE_LINUX_SLL: u16 = 113;

/// Linux SLL header length in bytes.
pub const LINUX_SLL_HEADER_LEN: usize = 16;

crate::enum_property! {
    /// Direction of a cooked-capture frame relative to the capturing host.
    pub enum CookedPacketType: u16 {
        Unicast = 0 => "UNICAST",
        Broadcast = 1 => "BROADCAST",
        Multicast = 2 => "MULTICAST",
        UnicastToAnotherHost = 3 => "UNICAST_TO_ANOTHER_HOST",
        SentByUs = 4 => "SENT_BY_US",
    }
}

/// Decoded cooked-capture header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SllLayer {
    pub src_addr: String,
    pub packet_type: CookedPacketType,
    /// Name of the encapsulated EtherType.
    pub protocol_type: String,
}

impl LayerFields for SllLayer {
    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("src_addr", FieldValue::string(self.src_addr.as_str())),
            ("packet_type", self.packet_type.into()),
            ("protocol_type", FieldValue::string(self.protocol_type.as_str())),
        ]
    }
}

/// Linux SLL protocol parser.
#[derive(Debug, Clone, Copy)]
pub struct LinuxSllProtocol;

impl Protocol for LinuxSllProtocol {
    fn name(&self) -> &'static str {
        "SLL"
    }

    fn display_name(&self) -> &'static str {
        "Linux cooked capture"
    }

    fn level(&self) -> StackLevel {
        StackLevel::Link
    }

    fn can_parse(&self, _data: &[u8], context: &ParseContext) -> bool {
        context.is_root() && context.link_type == LINKTYPE_LINUX_SLL
    }

    fn parse<'a>(
        &self,
        data: &'a [u8],
        _context: &ParseContext,
    ) -> Result<ParseResult<'a>, ProtocolError> {
        if data.len() < LINUX_SLL_HEADER_LEN {
            return Err(ProtocolError::PacketTooShort {
                protocol: "SLL",
                needed: LINUX_SLL_HEADER_LEN,
                have: data.len(),
            });
        }

        // Parse header fields (all big-endian)
        let pkt_type = u16::from_be_bytes([data[0], data[1]]);
        let addr_len = u16::from_be_bytes([data[4], data[5]]);
        // addr is bytes 6-13 (8 bytes, but only addr_len are valid)
        let protocol = u16::from_be_bytes([data[14], data[15]]);

        let valid_addr_len = (addr_len as usize).min(8);
        let layer = SllLayer {
            src_addr: format_hw_addr(&data[6..6 + valid_addr_len]),
            packet_type: CookedPacketType::from_code(pkt_type),
            protocol_type: ethertype::display(protocol),
        };

        Ok(ParseResult::new(
            LayerData::Sll(layer),
            data.len(),
            &data[LINUX_SLL_HEADER_LEN..],
        )
        .with_hint("ethertype", protocol as u64))
    }

    fn schema_fields(&self) -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::address("src_addr"),
            FieldDescriptor::enumerated("packet_type", "CookedPacketType"),
            FieldDescriptor::address("protocol_type")
                .with_description("Encapsulated EtherType name"),
        ]
    }
}
