//! IPv6 protocol parser with extension header support.

use std::net::IpAddr;

use etherparse::Ipv6HeaderSlice;

use super::ethernet::ethertype;
use super::ipv4::{ip_schema_fields, IpLayer, IpVersion};
use super::{ParseContext, ParseResult, Protocol};
use crate::error::ProtocolError;
use crate::record::{LayerData, StackLevel};
use crate::schema::FieldDescriptor;

/// IPv6 Next Header values for extension headers.
pub mod next_header {
    pub const HOP_BY_HOP: u8 = 0;
    pub const ROUTING: u8 = 43;
    pub const FRAGMENT: u8 = 44;
    pub const DESTINATION: u8 = 60;
    pub const MOBILITY: u8 = 135;
}

/// Upper-layer protocol found after the extension header chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct UpperLayer {
    next_header: u8,
    /// Bytes of extension headers consumed.
    consumed: usize,
    /// Set when a fragment header with a non-zero offset was crossed.
    later_fragment: bool,
}

/// Walk the extension header chain. Stops at the first header it can't size.
fn skip_extension_headers(first_nh: u8, data: &[u8]) -> UpperLayer {
    let mut upper = UpperLayer {
        next_header: first_nh,
        consumed: 0,
        later_fragment: false,
    };

    loop {
        let rest = &data[upper.consumed..];
        let len = match upper.next_header {
            next_header::HOP_BY_HOP
            | next_header::ROUTING
            | next_header::DESTINATION
            | next_header::MOBILITY => match rest.get(1) {
                // Length is in units of 8 octets, not including the first 8 octets
                Some(&ext_len) => (ext_len as usize + 1) * 8,
                None => break,
            },
            next_header::FRAGMENT => {
                if let Some(offset) = super::checksum::read_u16(rest, 2) {
                    upper.later_fragment |= offset >> 3 != 0;
                }
                8
            }
            _ => break,
        };

        if rest.len() < len {
            break;
        }
        upper.next_header = rest[0];
        upper.consumed += len;
    }

    upper
}

/// IPv6 protocol parser.
#[derive(Debug, Clone, Copy)]
pub struct Ipv6Protocol;

impl Protocol for Ipv6Protocol {
    fn name(&self) -> &'static str {
        "IP"
    }

    fn display_name(&self) -> &'static str {
        "IPv6"
    }

    fn level(&self) -> StackLevel {
        StackLevel::Network
    }

    fn can_parse(&self, _data: &[u8], context: &ParseContext) -> bool {
        context.hint("ethertype") == Some(ethertype::IPV6 as u64)
    }

    fn parse<'a>(
        &self,
        data: &'a [u8],
        _context: &ParseContext,
    ) -> Result<ParseResult<'a>, ProtocolError> {
        let ipv6 = Ipv6HeaderSlice::from_slice(data).map_err(|e| ProtocolError::InvalidField {
            protocol: "IPv6",
            field: "header",
            reason: e.to_string(),
        })?;

        let base_header_len = ipv6.slice().len();
        let size_total =
            (base_header_len + ipv6.payload_length() as usize).min(data.len());
        let payload = &data[base_header_len..size_total];
        let upper = skip_extension_headers(ipv6.next_header().0, payload);

        let src = ipv6.source_addr();
        let dst = ipv6.destination_addr();
        let layer = IpLayer {
            version: IpVersion::Ipv6,
            src_addr: src.to_string(),
            dst_addr: dst.to_string(),
            checksum_valid: None,
        };

        let mut result = ParseResult::new(
            LayerData::Ip(layer),
            size_total,
            &payload[upper.consumed..],
        )
        .with_addresses(IpAddr::V6(src), IpAddr::V6(dst));

        if !upper.later_fragment {
            let claimed = (ipv6.payload_length() as usize).saturating_sub(upper.consumed);
            result = result
                .with_hint("ip_protocol", upper.next_header as u64)
                .with_hint("ip_payload_len", claimed as u64);
        }

        Ok(result)
    }

    fn schema_fields(&self) -> Vec<FieldDescriptor> {
        ip_schema_fields()
    }
}
