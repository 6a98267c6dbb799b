//! Ethernet II protocol parser.

use etherparse::Ethernet2HeaderSlice;

use super::{FieldValue, ParseContext, ParseResult, Protocol};
use crate::error::ProtocolError;
use crate::record::{LayerData, LayerFields, StackLevel};
use crate::schema::{DataKind, FieldDescriptor};

/// Link type constant for Ethernet.
pub const LINKTYPE_ETHERNET: u16 = 1;

/// Well-known EtherType values (IEEE 802).
pub mod ethertype {
    pub const IPV4: u16 = 0x0800;
    pub const ARP: u16 = 0x0806;
    pub const WAKE_ON_LAN: u16 = 0x0842;
    pub const RARP: u16 = 0x8035;
    pub const APPLETALK: u16 = 0x809B;
    pub const VLAN: u16 = 0x8100;
    pub const IPX: u16 = 0x8137;
    pub const IPV6: u16 = 0x86DD;
    pub const FLOW_CONTROL: u16 = 0x8808;
    pub const MPLS: u16 = 0x8847;
    pub const PPPOE_DISCOVERY: u16 = 0x8863;
    pub const PPPOE_SESSION: u16 = 0x8864;
    pub const EAP_OVER_LAN: u16 = 0x888E;
    pub const QINQ: u16 = 0x88A8;
    pub const LLDP: u16 = 0x88CC;
    pub const MACSEC: u16 = 0x88E5;
    pub const PTP: u16 = 0x88F7;

    /// Conventional name of an EtherType, as shown by capture tools.
    pub fn name(value: u16) -> Option<&'static str> {
        let name = match value {
            IPV4 => "IPv4",
            ARP => "ARP",
            WAKE_ON_LAN => "WOL",
            RARP => "RARP",
            APPLETALK => "AppleTalk",
            VLAN => "802_1Q",
            IPX => "IPX",
            IPV6 => "IPv6",
            FLOW_CONTROL => "FlowControl",
            MPLS => "MPLS",
            PPPOE_DISCOVERY => "PPPoE_Discovery",
            PPPOE_SESSION => "PPPoE",
            EAP_OVER_LAN => "EAPOL",
            QINQ => "802_1AD",
            LLDP => "LLDP",
            MACSEC => "MACsec",
            PTP => "PTP",
            _ => return None,
        };
        Some(name)
    }

    /// Name of an EtherType, falling back to its hex value.
    pub fn display(value: u16) -> String {
        name(value)
            .map(str::to_string)
            .unwrap_or_else(|| format!("0x{value:04x}"))
    }
}

/// Decoded Ethernet II header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthernetLayer {
    pub src_addr: String,
    pub dst_addr: String,
    pub ethertype: u16,
}

impl LayerFields for EthernetLayer {
    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("src_addr", FieldValue::string(self.src_addr.as_str())),
            ("dst_addr", FieldValue::string(self.dst_addr.as_str())),
            ("ethertype", FieldValue::UInt16(self.ethertype)),
        ]
    }
}

/// Ethernet II protocol parser.
#[derive(Debug, Clone, Copy)]
pub struct EthernetProtocol;

impl Protocol for EthernetProtocol {
    fn name(&self) -> &'static str {
        "Ethernet"
    }

    fn display_name(&self) -> &'static str {
        "Ethernet II"
    }

    fn level(&self) -> StackLevel {
        StackLevel::Link
    }

    fn can_parse(&self, _data: &[u8], context: &ParseContext) -> bool {
        context.is_root() && context.link_type == LINKTYPE_ETHERNET
    }

    fn parse<'a>(
        &self,
        data: &'a [u8],
        _context: &ParseContext,
    ) -> Result<ParseResult<'a>, ProtocolError> {
        let eth = Ethernet2HeaderSlice::from_slice(data).map_err(|_| {
            ProtocolError::PacketTooShort {
                protocol: "Ethernet",
                needed: 14,
                have: data.len(),
            }
        })?;

        let ethertype = eth.ether_type().0;
        let layer = EthernetLayer {
            src_addr: super::format_hw_addr(&eth.source()),
            dst_addr: super::format_hw_addr(&eth.destination()),
            ethertype,
        };

        let header_len = eth.slice().len();
        Ok(
            ParseResult::new(LayerData::Ethernet(layer), data.len(), &data[header_len..])
                .with_hint("ethertype", ethertype as u64),
        )
    }

    fn schema_fields(&self) -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::address("src_addr"),
            FieldDescriptor::address("dst_addr"),
            FieldDescriptor::new("ethertype", DataKind::UInt16),
        ]
    }
}
