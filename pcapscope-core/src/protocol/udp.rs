//! UDP protocol parser.

use std::net::IpAddr;

use etherparse::UdpHeaderSlice;

use super::checksum::{checksum_with_zeroed_field, pseudo_header_sum};
use super::{FieldValue, ParseContext, ParseResult, Protocol};
use crate::error::ProtocolError;
use crate::record::{LayerData, LayerFields, StackLevel};
use crate::schema::FieldDescriptor;

/// IP protocol number for UDP.
pub const IP_PROTO_UDP: u8 = 17;

/// UDP header size.
const HEADER_LEN: usize = 8;

/// Offset of the checksum within the UDP header.
const CHECKSUM_OFFSET: usize = 6;

/// Decoded UDP datagram header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UdpLayer {
    pub src_port: u16,
    pub dst_port: u16,
    /// `None` when no network-layer addresses were available for the pseudo-header.
    pub checksum_valid: Option<bool>,
}

impl LayerFields for UdpLayer {
    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("src_port", FieldValue::UInt16(self.src_port)),
            ("dst_port", FieldValue::UInt16(self.dst_port)),
            ("checksum_valid", FieldValue::optional(self.checksum_valid)),
        ]
    }
}

/// Verify a UDP checksum.
///
/// Over IPv4 a zero checksum means the sender did not compute one and is
/// accepted. A computed value of zero is transmitted as 0xFFFF.
fn verify_checksum(datagram: &[u8], transmitted: u16, addresses: (IpAddr, IpAddr)) -> bool {
    if transmitted == 0 && addresses.0.is_ipv4() {
        return true;
    }

    let pseudo = pseudo_header_sum(addresses, IP_PROTO_UDP, datagram.len());
    let computed = match checksum_with_zeroed_field(datagram, CHECKSUM_OFFSET, pseudo) {
        0 => 0xFFFF,
        value => value,
    };
    computed == transmitted
}

/// UDP protocol parser.
#[derive(Debug, Clone, Copy)]
pub struct UdpProtocol;

impl Protocol for UdpProtocol {
    fn name(&self) -> &'static str {
        "UDP"
    }

    fn level(&self) -> StackLevel {
        StackLevel::Transport
    }

    fn can_parse(&self, _data: &[u8], context: &ParseContext) -> bool {
        context.hint("ip_protocol") == Some(IP_PROTO_UDP as u64)
    }

    fn parse<'a>(
        &self,
        data: &'a [u8],
        context: &ParseContext,
    ) -> Result<ParseResult<'a>, ProtocolError> {
        let udp = UdpHeaderSlice::from_slice(data).map_err(|_| ProtocolError::PacketTooShort {
            protocol: "UDP",
            needed: HEADER_LEN,
            have: data.len(),
        })?;

        let length = udp.length() as usize;
        if length < HEADER_LEN {
            return Err(ProtocolError::InvalidField {
                protocol: "UDP",
                field: "length",
                reason: format!("{length} is smaller than the header"),
            });
        }

        // The length field bounds the datagram; a short capture bounds it further
        let size_total = length.min(data.len());
        let datagram = &data[..size_total];

        // A truncated capture can't be verified
        let checksum_valid = context
            .addresses
            .filter(|_| length <= data.len())
            .map(|addresses| verify_checksum(datagram, udp.checksum(), addresses));

        let layer = UdpLayer {
            src_port: udp.source_port(),
            dst_port: udp.destination_port(),
            checksum_valid,
        };

        Ok(
            ParseResult::new(LayerData::Udp(layer), size_total, &datagram[HEADER_LEN..])
                .with_hint("src_port", udp.source_port() as u64)
                .with_hint("dst_port", udp.destination_port() as u64),
        )
    }

    fn schema_fields(&self) -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::src_port(),
            FieldDescriptor::dst_port(),
            FieldDescriptor::checksum_valid(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::checksum::fill_checksum;

    fn udp_context(src: &str, dst: &str) -> ParseContext {
        let mut context = ParseContext::new(1);
        context.parent_protocol = Some("IP");
        context.insert_hint("ip_protocol", IP_PROTO_UDP as u64);
        context.addresses = Some((src.parse().unwrap(), dst.parse().unwrap()));
        context
    }

    fn datagram(context: &ParseContext, payload: &[u8]) -> Vec<u8> {
        let length = (HEADER_LEN + payload.len()) as u16;
        let mut data = vec![0x30, 0x39, 0x00, 0x35];
        data.extend_from_slice(&length.to_be_bytes());
        data.extend_from_slice(&[0x00, 0x00]);
        data.extend_from_slice(payload);
        let pseudo = pseudo_header_sum(context.addresses.unwrap(), IP_PROTO_UDP, data.len());
        fill_checksum(&mut data, CHECKSUM_OFFSET, pseudo);
        if data[6..8] == [0, 0] {
            data[6..8].copy_from_slice(&[0xff, 0xff]);
        }
        data
    }

    #[test]
    fn test_parse_udp() {
        let context = udp_context("10.0.0.1", "10.0.0.2");
        let data = datagram(&context, &[1, 2, 3, 4]);

        let result = UdpProtocol.parse(&data, &context).unwrap();

        assert_eq!(result.get("src_port"), Some(FieldValue::UInt16(12345)));
        assert_eq!(result.get("dst_port"), Some(FieldValue::UInt16(53)));
        assert_eq!(result.get("checksum_valid"), Some(FieldValue::Bool(true)));
        assert_eq!(result.remaining, &[1, 2, 3, 4]);
        assert_eq!(result.hint("src_port"), Some(12345));
        assert_eq!(result.hint("dst_port"), Some(53));
    }

    #[test]
    fn test_ipv6_checksum() {
        let context = udp_context("2001:db8::1", "2001:db8::2");
        let mut data = datagram(&context, b"abc");

        let result = UdpProtocol.parse(&data, &context).unwrap();
        assert_eq!(result.get("checksum_valid"), Some(FieldValue::Bool(true)));

        data[CHECKSUM_OFFSET + 1] ^= 0x01;
        let result = UdpProtocol.parse(&data, &context).unwrap();
        assert_eq!(result.get("checksum_valid"), Some(FieldValue::Bool(false)));
    }

    #[test]
    fn test_zero_checksum_over_ipv4() {
        let context = udp_context("10.0.0.1", "10.0.0.2");
        let mut data = datagram(&context, &[9, 9]);
        data[6] = 0;
        data[7] = 0;

        let result = UdpProtocol.parse(&data, &context).unwrap();
        assert_eq!(result.get("checksum_valid"), Some(FieldValue::Bool(true)));
    }

    #[test]
    fn test_zero_checksum_over_ipv6_is_invalid() {
        let context = udp_context("2001:db8::1", "2001:db8::2");
        let mut data = datagram(&context, &[9, 9]);
        data[6] = 0;
        data[7] = 0;

        let result = UdpProtocol.parse(&data, &context).unwrap();
        assert_eq!(result.get("checksum_valid"), Some(FieldValue::Bool(false)));
    }

    #[test]
    fn test_length_field_bounds_payload() {
        let context = udp_context("10.0.0.1", "10.0.0.2");
        let mut data = datagram(&context, &[7, 7]);
        data.extend_from_slice(&[0, 0, 0]); // trailing bytes beyond the datagram

        let result = UdpProtocol.parse(&data, &context).unwrap();
        assert_eq!(result.size_total, 10);
        assert_eq!(result.remaining, &[7, 7]);
        assert_eq!(result.get("checksum_valid"), Some(FieldValue::Bool(true)));
    }

    #[test]
    fn test_invalid_length() {
        let context = udp_context("10.0.0.1", "10.0.0.2");
        let mut data = datagram(&context, &[]);
        data[4] = 0;
        data[5] = 4;

        let err = UdpProtocol.parse(&data, &context).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidField { field: "length", .. }));
    }

    #[test]
    fn test_too_short() {
        let context = udp_context("10.0.0.1", "10.0.0.2");
        let err = UdpProtocol.parse(&[0, 1, 2], &context).unwrap_err();
        assert!(matches!(err, ProtocolError::PacketTooShort { have: 3, .. }));
    }
}
