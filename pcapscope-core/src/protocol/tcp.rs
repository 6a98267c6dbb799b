//! TCP protocol parser.

use etherparse::TcpHeaderSlice;

use super::checksum::{checksum_with_zeroed_field, pseudo_header_sum};
use super::{FieldValue, ParseContext, ParseResult, Protocol};
use crate::error::ProtocolError;
use crate::record::{LayerData, LayerFields, StackLevel};
use crate::schema::FieldDescriptor;

/// IP protocol number for TCP.
pub const IP_PROTO_TCP: u8 = 6;

/// Offset of the checksum within the TCP header.
const CHECKSUM_OFFSET: usize = 16;

/// Decoded TCP segment header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpLayer {
    pub src_port: u16,
    pub dst_port: u16,
    /// `None` when no network-layer addresses were available for the pseudo-header.
    pub checksum_valid: Option<bool>,
}

impl LayerFields for TcpLayer {
    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("src_port", FieldValue::UInt16(self.src_port)),
            ("dst_port", FieldValue::UInt16(self.dst_port)),
            ("checksum_valid", FieldValue::optional(self.checksum_valid)),
        ]
    }
}

/// TCP protocol parser.
#[derive(Debug, Clone, Copy)]
pub struct TcpProtocol;

impl Protocol for TcpProtocol {
    fn name(&self) -> &'static str {
        "TCP"
    }

    fn level(&self) -> StackLevel {
        StackLevel::Transport
    }

    fn can_parse(&self, _data: &[u8], context: &ParseContext) -> bool {
        context.hint("ip_protocol") == Some(IP_PROTO_TCP as u64)
    }

    fn parse<'a>(
        &self,
        data: &'a [u8],
        context: &ParseContext,
    ) -> Result<ParseResult<'a>, ProtocolError> {
        let tcp = TcpHeaderSlice::from_slice(data).map_err(|e| ProtocolError::InvalidField {
            protocol: "TCP",
            field: "header",
            reason: e.to_string(),
        })?;

        // A segment cut short by the snaplen can't be verified
        let complete = context
            .hint("ip_payload_len")
            .map_or(true, |claimed| data.len() as u64 >= claimed);

        // The checksum covers the whole segment plus the pseudo-header
        let checksum_valid = context.addresses.filter(|_| complete).map(|addresses| {
            let pseudo = pseudo_header_sum(addresses, IP_PROTO_TCP, data.len());
            checksum_with_zeroed_field(data, CHECKSUM_OFFSET, pseudo) == tcp.checksum()
        });

        let layer = TcpLayer {
            src_port: tcp.source_port(),
            dst_port: tcp.destination_port(),
            checksum_valid,
        };

        let header_len = tcp.slice().len();
        Ok(
            ParseResult::new(LayerData::Tcp(layer), data.len(), &data[header_len..])
                .with_hint("src_port", tcp.source_port() as u64)
                .with_hint("dst_port", tcp.destination_port() as u64),
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
    use std::net::IpAddr;

    fn tcp_context() -> ParseContext {
        let mut context = ParseContext::new(1);
        context.parent_protocol = Some("IP");
        context.insert_hint("ip_protocol", IP_PROTO_TCP as u64);
        let src: IpAddr = "192.168.1.1".parse().unwrap();
        let dst: IpAddr = "192.168.1.2".parse().unwrap();
        context.addresses = Some((src, dst));
        context
    }

    fn segment(context: &ParseContext, payload: &[u8]) -> Vec<u8> {
        let mut segment = vec![
            0x30, 0x39, // Src port: 12345
            0x00, 0x50, // Dst port: 80
            0x00, 0x00, 0x00, 0x01, // Seq
            0x00, 0x00, 0x00, 0x00, // Ack
            0x50, 0x18, // Data offset 5, PSH+ACK
            0xff, 0xff, // Window
            0x00, 0x00, // Checksum
            0x00, 0x00, // Urgent pointer
        ];
        segment.extend_from_slice(payload);
        let pseudo =
            pseudo_header_sum(context.addresses.unwrap(), IP_PROTO_TCP, segment.len());
        fill_checksum(&mut segment, CHECKSUM_OFFSET, pseudo);
        segment
    }

    #[test]
    fn test_parse_tcp() {
        let context = tcp_context();
        let data = segment(&context, b"GET /");

        let result = TcpProtocol.parse(&data, &context).unwrap();

        assert_eq!(result.get("src_port"), Some(FieldValue::UInt16(12345)));
        assert_eq!(result.get("dst_port"), Some(FieldValue::UInt16(80)));
        assert_eq!(result.get("checksum_valid"), Some(FieldValue::Bool(true)));
        assert_eq!(result.remaining, b"GET /");
        assert_eq!(result.size_total, 25);
        assert_eq!(result.hint("dst_port"), Some(80));
    }

    #[test]
    fn test_corrupted_checksum() {
        let context = tcp_context();
        let mut data = segment(&context, b"hello");
        data[CHECKSUM_OFFSET] ^= 0x5a;

        let result = TcpProtocol.parse(&data, &context).unwrap();

        assert_eq!(result.get("checksum_valid"), Some(FieldValue::Bool(false)));
        // Everything else is still decoded
        assert_eq!(result.get("src_port"), Some(FieldValue::UInt16(12345)));
        assert_eq!(result.remaining, b"hello");
    }

    #[test]
    fn test_checksum_unknown_without_addresses() {
        let context = tcp_context();
        let data = segment(&context, &[]);

        let mut bare = ParseContext::new(1);
        bare.insert_hint("ip_protocol", IP_PROTO_TCP as u64);
        let result = TcpProtocol.parse(&data, &bare).unwrap();

        assert_eq!(result.get("checksum_valid"), Some(FieldValue::Null));
    }

    #[test]
    fn test_truncated_segment_not_verified() {
        let mut context = tcp_context();
        let data = segment(&context, &[0x42; 40]);
        // IP announced the full segment; the capture kept 30 bytes of it
        context.insert_hint("ip_payload_len", data.len() as u64);

        let result = TcpProtocol.parse(&data[..30], &context).unwrap();

        assert_eq!(result.get("checksum_valid"), Some(FieldValue::Null));
        assert_eq!(result.get("dst_port"), Some(FieldValue::UInt16(80)));
        assert_eq!(result.remaining.len(), 10);

        // The complete segment still verifies under the same hint
        let result = TcpProtocol.parse(&data, &context).unwrap();
        assert_eq!(result.get("checksum_valid"), Some(FieldValue::Bool(true)));
    }

    #[test]
    fn test_can_parse() {
        assert!(TcpProtocol.can_parse(&[], &tcp_context()));

        let mut udp = ParseContext::new(1);
        udp.insert_hint("ip_protocol", 17);
        assert!(!TcpProtocol.can_parse(&[], &udp));
    }

    #[test]
    fn test_bad_data_offset() {
        let context = tcp_context();
        let mut data = segment(&context, &[]);
        data[12] = 0x20; // Data offset 2 (< 5)

        assert!(TcpProtocol.parse(&data, &context).is_err());
    }
}
