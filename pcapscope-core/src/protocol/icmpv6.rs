//! ICMPv6 protocol parser (RFC 4443, RFC 4861).

use super::checksum::{checksum_with_zeroed_field, pseudo_header_sum};
use super::icmp::{
    icmp_schema_fields, id_and_seq, IcmpLayer, IcmpVersion, CHECKSUM_OFFSET, HEADER_LEN,
};
use super::{ParseContext, ParseResult, Protocol};
use crate::error::ProtocolError;
use crate::record::{LayerData, StackLevel};
use crate::schema::FieldDescriptor;

/// IP protocol number for ICMPv6.
pub const IP_PROTO_ICMPV6: u8 = 58;

crate::enum_property! {
    /// ICMPv6 message types (IANA registry).
    pub enum Icmpv6Type: u8 {
        DestUnreach = 1 => "DEST_UNREACH",
        PacketTooBig = 2 => "PACKET_TOO_BIG",
        TimeExceeded = 3 => "TIME_EXCEEDED",
        ParameterProblem = 4 => "PARAMETER_PROBLEM",
        EchoRequest = 128 => "ECHO_REQUEST",
        EchoReply = 129 => "ECHO_REPLY",
        MldQuery = 130 => "MLD_QUERY",
        MldReport = 131 => "MLD_REPORT",
        MldDone = 132 => "MLD_DONE",
        RouterSolicitation = 133 => "ROUTER_SOLICITATION",
        RouterAdvertisement = 134 => "ROUTER_ADVERTISEMENT",
        NeighborSolicitation = 135 => "NEIGHBOR_SOLICITATION",
        NeighborAdvertisement = 136 => "NEIGHBOR_ADVERTISEMENT",
        Redirect = 137 => "REDIRECT",
        RouterRenumbering = 138 => "ROUTER_RENUMBERING",
        NodeInformationQuery = 139 => "NODE_INFORMATION_QUERY",
        NodeInformationResponse = 140 => "NODE_INFORMATION_RESPONSE",
        InverseNeighborSolicitation = 141 => "INVERSE_NEIGHBOR_SOLICITATION",
        InverseNeighborAdvertisement = 142 => "INVERSE_NEIGHBOR_ADVERTISEMENT",
        Mldv2Report = 143 => "MLDV2_REPORT",
        HomeAgentDiscoveryRequest = 144 => "HOME_AGENT_DISCOVERY_REQUEST",
        HomeAgentDiscoveryReply = 145 => "HOME_AGENT_DISCOVERY_REPLY",
        MobilePrefixSolicitation = 146 => "MOBILE_PREFIX_SOLICITATION",
        MobilePrefixAdvertisement = 147 => "MOBILE_PREFIX_ADVERTISEMENT",
        MulticastRouterAdvertisement = 151 => "MULTICAST_ROUTER_ADVERTISEMENT",
        MulticastRouterSolicitation = 152 => "MULTICAST_ROUTER_SOLICITATION",
        MulticastRouterTermination = 153 => "MULTICAST_ROUTER_TERMINATION",
    }
}

crate::enum_property! {
    /// ICMPv6 codes, keyed by (type, code).
    pub enum Icmpv6Code: (u8, u8) {
        NoRoute = (1, 0) => "NO_ROUTE",
        AdminProhibited = (1, 1) => "ADMIN_PROHIBITED",
        BeyondScope = (1, 2) => "BEYOND_SCOPE",
        AddressUnreachable = (1, 3) => "ADDRESS_UNREACHABLE",
        PortUnreachable = (1, 4) => "PORT_UNREACHABLE",
        SourcePolicyFailed = (1, 5) => "SOURCE_POLICY_FAILED",
        RejectRoute = (1, 6) => "REJECT_ROUTE",
        SourceRoutingHeaderError = (1, 7) => "SOURCE_ROUTING_HEADER_ERROR",
        HopLimitExceeded = (3, 0) => "HOP_LIMIT_EXCEEDED",
        ReassemblyTimeExceeded = (3, 1) => "REASSEMBLY_TIME_EXCEEDED",
        ErroneousHeaderField = (4, 0) => "ERRONEOUS_HEADER_FIELD",
        UnrecognizedNextHeader = (4, 1) => "UNRECOGNIZED_NEXT_HEADER",
        UnrecognizedOption = (4, 2) => "UNRECOGNIZED_OPTION",
        RenumberingCommand = (138, 0) => "RENUMBERING_COMMAND",
        RenumberingResult = (138, 1) => "RENUMBERING_RESULT",
        SequenceNumberReset = (138, 255) => "SEQUENCE_NUMBER_RESET",
    }
    synthetic {
        NoCode => "NO_CODE",
    }
}

impl Icmpv6Code {
    /// Resolve a code within its message type, with the same `NoCode` rule as ICMPv4.
    pub fn from_parts(icmp_type: u8, code: u8) -> Self {
        match Self::from_code((icmp_type, code)) {
            Icmpv6Code::Unknown if code == 0 => Icmpv6Code::NoCode,
            resolved => resolved,
        }
    }
}

/// ICMPv6 protocol parser.
#[derive(Debug, Clone, Copy)]
pub struct Icmpv6Protocol;

impl Protocol for Icmpv6Protocol {
    fn name(&self) -> &'static str {
        "ICMPV6"
    }

    fn display_name(&self) -> &'static str {
        "ICMPv6"
    }

    fn level(&self) -> StackLevel {
        StackLevel::Transport
    }

    fn can_parse(&self, _data: &[u8], context: &ParseContext) -> bool {
        context.hint("ip_protocol") == Some(IP_PROTO_ICMPV6 as u64)
    }

    fn parse<'a>(
        &self,
        data: &'a [u8],
        context: &ParseContext,
    ) -> Result<ParseResult<'a>, ProtocolError> {
        if data.len() < HEADER_LEN {
            return Err(ProtocolError::PacketTooShort {
                protocol: "ICMPv6",
                needed: HEADER_LEN,
                have: data.len(),
            });
        }

        let raw_type = data[0];
        let raw_code = data[1];
        let checksum = u16::from_be_bytes([data[2], data[3]]);
        let icmp_type = Icmpv6Type::from_code(raw_type);

        let has_id = matches!(icmp_type, Icmpv6Type::EchoRequest | Icmpv6Type::EchoReply);
        let (identifier, seq) = id_and_seq(data, has_id);

        // Unlike ICMPv4, the checksum covers the IPv6 pseudo-header
        let checksum_valid = context.addresses.map(|addresses| {
            let pseudo = pseudo_header_sum(addresses, IP_PROTO_ICMPV6, data.len());
            checksum_with_zeroed_field(data, CHECKSUM_OFFSET, pseudo) == checksum
        });

        let layer = IcmpLayer {
            version: IcmpVersion::Icmpv6,
            icmp_type: icmp_type.into(),
            icmp_code: Icmpv6Code::from_parts(raw_type, raw_code).into(),
            identifier,
            seq,
            checksum_valid,
        };

        Ok(ParseResult::new(
            LayerData::Icmp(layer),
            data.len(),
            &data[HEADER_LEN..],
        ))
    }

    fn schema_fields(&self) -> Vec<FieldDescriptor> {
        icmp_schema_fields("Icmpv6Type", "Icmpv6Code")
    }
}
