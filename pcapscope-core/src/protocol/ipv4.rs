//! IPv4 protocol parser.

use std::net::IpAddr;

use etherparse::Ipv4HeaderSlice;

use super::checksum::checksum_with_zeroed_field;
use super::ethernet::ethertype;
use super::{FieldValue, ParseContext, ParseResult, Protocol};
use crate::error::ProtocolError;
use crate::record::{LayerData, LayerFields, StackLevel};
use crate::schema::FieldDescriptor;

/// Offset of the header checksum within the IPv4 header.
const CHECKSUM_OFFSET: usize = 10;

crate::enum_property! {
    /// IP protocol versions.
    pub enum IpVersion: u8 {
        Ipv4 = 4 => "IPV4",
        Ipv6 = 6 => "IPV6",
    }
}

/// Decoded IP header, shared by IPv4 and IPv6.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpLayer {
    pub version: IpVersion,
    pub src_addr: String,
    pub dst_addr: String,
    /// `None` for IPv6, which has no header checksum.
    pub checksum_valid: Option<bool>,
}

impl LayerFields for IpLayer {
    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("version", self.version.into()),
            ("src_addr", FieldValue::string(self.src_addr.as_str())),
            ("dst_addr", FieldValue::string(self.dst_addr.as_str())),
            ("checksum_valid", FieldValue::optional(self.checksum_valid)),
        ]
    }
}

/// Data fields shared by both IP decoders.
pub(crate) fn ip_schema_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::enumerated("version", "IpVersion"),
        FieldDescriptor::address("src_addr"),
        FieldDescriptor::address("dst_addr"),
        FieldDescriptor::checksum_valid(),
    ]
}

/// IPv4 protocol parser.
#[derive(Debug, Clone, Copy)]
pub struct Ipv4Protocol;

impl Protocol for Ipv4Protocol {
    fn name(&self) -> &'static str {
        "IP"
    }

    fn display_name(&self) -> &'static str {
        "IPv4"
    }

    fn level(&self) -> StackLevel {
        StackLevel::Network
    }

    fn can_parse(&self, _data: &[u8], context: &ParseContext) -> bool {
        context.hint("ethertype") == Some(ethertype::IPV4 as u64)
    }

    fn parse<'a>(
        &self,
        data: &'a [u8],
        _context: &ParseContext,
    ) -> Result<ParseResult<'a>, ProtocolError> {
        let ip = Ipv4HeaderSlice::from_slice(data).map_err(|e| ProtocolError::InvalidField {
            protocol: "IPv4",
            field: "header",
            reason: e.to_string(),
        })?;

        let header = ip.slice();
        let header_len = header.len();
        let checksum_valid =
            checksum_with_zeroed_field(header, CHECKSUM_OFFSET, 0) == ip.header_checksum();

        let src = ip.source_addr();
        let dst = ip.destination_addr();
        let layer = IpLayer {
            version: IpVersion::Ipv4,
            src_addr: src.to_string(),
            dst_addr: dst.to_string(),
            checksum_valid: Some(checksum_valid),
        };

        // Trailing link padding is not part of the datagram
        let size_total = (ip.total_len() as usize).clamp(header_len, data.len());
        let mut result = ParseResult::new(
            LayerData::Ip(layer),
            size_total,
            &data[header_len..size_total],
        )
        .with_addresses(IpAddr::V4(src), IpAddr::V4(dst));

        // Non-first fragments carry no transport header
        if ip.fragments_offset().value() == 0 {
            let claimed = (ip.total_len() as usize).saturating_sub(header_len);
            result = result
                .with_hint("ip_protocol", ip.protocol().0 as u64)
                .with_hint("ip_payload_len", claimed as u64);
        }

        Ok(result)
    }

    fn schema_fields(&self) -> Vec<FieldDescriptor> {
        ip_schema_fields()
    }
}
