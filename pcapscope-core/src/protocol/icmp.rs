//! ICMP protocol parser.

use super::checksum::{checksum_with_zeroed_field, read_u16};
use super::{FieldValue, ParseContext, ParseResult, PropertyValue, Protocol};
use crate::error::ProtocolError;
use crate::record::{LayerData, LayerFields, StackLevel};
use crate::schema::{DataKind, FieldDescriptor};

/// IP protocol number for ICMP.
pub const IP_PROTO_ICMP: u8 = 1;

/// ICMP header size (type, code, checksum, rest of header).
pub(crate) const HEADER_LEN: usize = 8;

/// Offset of the checksum within the ICMP header.
pub(crate) const CHECKSUM_OFFSET: usize = 2;

crate::enum_property! {
    /// ICMP message family.
    pub enum IcmpVersion: u8 {
        Icmpv4 = 4 => "ICMPV4",
        Icmpv6 = 6 => "ICMPV6",
    }
}

crate::enum_property! {
    /// ICMPv4 message types (IANA registry).
    pub enum IcmpType: u8 {
        EchoReply = 0 => "ECHO_REPLY",
        DestUnreach = 3 => "DEST_UNREACH",
        SourceQuench = 4 => "SOURCE_QUENCH",
        Redirect = 5 => "REDIRECT",
        EchoRequest = 8 => "ECHO_REQUEST",
        RouterAdvertisement = 9 => "ROUTER_ADVERTISEMENT",
        RouterSolicitation = 10 => "ROUTER_SOLICITATION",
        TimeExceeded = 11 => "TIME_EXCEEDED",
        ParameterProblem = 12 => "PARAMETER_PROBLEM",
        TimestampRequest = 13 => "TIMESTAMP_REQUEST",
        TimestampReply = 14 => "TIMESTAMP_REPLY",
        InformationRequest = 15 => "INFORMATION_REQUEST",
        InformationResponse = 16 => "INFORMATION_RESPONSE",
        AddressMaskRequest = 17 => "ADDRESS_MASK_REQUEST",
        AddressMaskReply = 18 => "ADDRESS_MASK_REPLY",
        Traceroute = 30 => "TRACEROUTE",
        DatagramConversionError = 31 => "DATAGRAM_CONVERSION_ERROR",
        MobileHostRedirect = 32 => "MOBILE_HOST_REDIRECT",
        Ipv6WhereAreYou = 33 => "IPV6_WHERE_ARE_YOU",
        Ipv6IAmHere = 34 => "IPV6_I_AM_HERE",
        MobileRegistrationRequest = 35 => "MOBILE_REGISTRATION_REQUEST",
        MobileRegistrationReply = 36 => "MOBILE_REGISTRATION_REPLY",
        DomainNameRequest = 37 => "DOMAIN_NAME_REQUEST",
        DomainNameReply = 38 => "DOMAIN_NAME_REPLY",
        Skip = 39 => "SKIP",
        Photuris = 40 => "PHOTURIS",
        ExtendedEchoRequest = 42 => "EXTENDED_ECHO_REQUEST",
        ExtendedEchoReply = 43 => "EXTENDED_ECHO_REPLY",
    }
}

crate::enum_property! {
    /// ICMPv4 codes, keyed by (type, code).
    pub enum IcmpCode: (u8, u8) {
        NetworkUnreachable = (3, 0) => "NETWORK_UNREACHABLE",
        HostUnreachable = (3, 1) => "HOST_UNREACHABLE",
        ProtocolUnreachable = (3, 2) => "PROTOCOL_UNREACHABLE",
        PortUnreachable = (3, 3) => "PORT_UNREACHABLE",
        FragmentationNeeded = (3, 4) => "FRAGMENTATION_NEEDED",
        SourceRouteFailed = (3, 5) => "SOURCE_ROUTE_FAILED",
        NetworkUnknown = (3, 6) => "NETWORK_UNKNOWN",
        HostUnknown = (3, 7) => "HOST_UNKNOWN",
        NetworkProhibited = (3, 9) => "NETWORK_PROHIBITED",
        HostProhibited = (3, 10) => "HOST_PROHIBITED",
        TosNetworkUnreachable = (3, 11) => "TOS_NETWORK_UNREACHABLE",
        TosHostUnreachable = (3, 12) => "TOS_HOST_UNREACHABLE",
        CommunicationProhibited = (3, 13) => "COMMUNICATION_PROHIBITED",
        HostPrecedenceViolation = (3, 14) => "HOST_PRECEDENCE_VIOLATION",
        PrecedenceCutoff = (3, 15) => "PRECEDENCE_CUTOFF",
        NetworkRedirect = (5, 0) => "NETWORK_REDIRECT",
        HostRedirect = (5, 1) => "HOST_REDIRECT",
        TosNetworkRedirect = (5, 2) => "TOS_NETWORK_REDIRECT",
        TosHostRedirect = (5, 3) => "TOS_HOST_REDIRECT",
        TtlZeroDuringTransit = (11, 0) => "TTL_ZERO_DURING_TRANSIT",
        TtlZeroDuringReassembly = (11, 1) => "TTL_ZERO_DURING_REASSEMBLY",
        IpHeaderBad = (12, 0) => "IP_HEADER_BAD",
        RequiredOptionMissing = (12, 1) => "REQUIRED_OPTION_MISSING",
        BadSpi = (40, 0) => "BAD_SPI",
        AuthenticationFailed = (40, 1) => "AUTHENTICATION_FAILED",
        DecompressionFailed = (40, 2) => "DECOMPRESSION_FAILED",
        DecryptionFailed = (40, 3) => "DECRYPTION_FAILED",
        NeedAuthentication = (40, 4) => "NEED_AUTHENTICATION",
        NeedAuthorization = (40, 5) => "NEED_AUTHORIZATION",
    }
    synthetic {
        NoCode => "NO_CODE",
    }
}

impl IcmpCode {
    /// Resolve a code within its message type. A zero code the type doesn't
    /// declare is `NoCode`; anything else undeclared is `Unknown`.
    pub fn from_parts(icmp_type: u8, code: u8) -> Self {
        match Self::from_code((icmp_type, code)) {
            IcmpCode::Unknown if code == 0 => IcmpCode::NoCode,
            resolved => resolved,
        }
    }
}

/// Decoded ICMP message header, shared by ICMPv4 and ICMPv6.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcmpLayer {
    pub version: IcmpVersion,
    /// `IcmpType` or `Icmpv6Type`, depending on `version`.
    pub icmp_type: PropertyValue,
    /// `IcmpCode` or `Icmpv6Code`, depending on `version`.
    pub icmp_code: PropertyValue,
    pub identifier: Option<u16>,
    pub seq: Option<u16>,
    pub checksum_valid: Option<bool>,
}

impl IcmpLayer {
    /// Layer name: one per version, so each has its own typed columns.
    pub fn protocol_name(&self) -> &'static str {
        match self.version {
            IcmpVersion::Icmpv6 => "ICMPV6",
            _ => "ICMPV4",
        }
    }
}

impl LayerFields for IcmpLayer {
    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("version", self.version.into()),
            ("icmp_type", self.icmp_type.into()),
            ("icmp_code", self.icmp_code.into()),
            ("identifier", FieldValue::optional(self.identifier)),
            ("seq", FieldValue::optional(self.seq)),
            ("checksum_valid", FieldValue::optional(self.checksum_valid)),
        ]
    }
}

/// Identifier and sequence number, for message types that carry them.
pub(crate) fn id_and_seq(data: &[u8], has_id: bool) -> (Option<u16>, Option<u16>) {
    if has_id {
        (read_u16(data, 4), read_u16(data, 6))
    } else {
        (None, None)
    }
}

/// Data fields shared by both ICMP decoders.
pub(crate) fn icmp_schema_fields(
    type_property: &'static str,
    code_property: &'static str,
) -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::enumerated("version", "IcmpVersion"),
        FieldDescriptor::enumerated("icmp_type", type_property),
        FieldDescriptor::enumerated("icmp_code", code_property),
        FieldDescriptor::nullable("identifier", DataKind::UInt16),
        FieldDescriptor::nullable("seq", DataKind::UInt16),
        FieldDescriptor::checksum_valid(),
    ]
}

/// ICMPv4 protocol parser.
#[derive(Debug, Clone, Copy)]
pub struct IcmpProtocol;

impl Protocol for IcmpProtocol {
    fn name(&self) -> &'static str {
        "ICMPV4"
    }

    fn display_name(&self) -> &'static str {
        "ICMPv4"
    }

    fn level(&self) -> StackLevel {
        StackLevel::Transport
    }

    fn can_parse(&self, _data: &[u8], context: &ParseContext) -> bool {
        context.hint("ip_protocol") == Some(IP_PROTO_ICMP as u64)
    }

    fn parse<'a>(
        &self,
        data: &'a [u8],
        _context: &ParseContext,
    ) -> Result<ParseResult<'a>, ProtocolError> {
        if data.len() < HEADER_LEN {
            return Err(ProtocolError::PacketTooShort {
                protocol: "ICMP",
                needed: HEADER_LEN,
                have: data.len(),
            });
        }

        let raw_type = data[0];
        let raw_code = data[1];
        let checksum = u16::from_be_bytes([data[2], data[3]]);
        let icmp_type = IcmpType::from_code(raw_type);

        let has_id = matches!(
            icmp_type,
            IcmpType::EchoReply
                | IcmpType::EchoRequest
                | IcmpType::TimestampRequest
                | IcmpType::TimestampReply
                | IcmpType::InformationRequest
                | IcmpType::InformationResponse
                | IcmpType::AddressMaskRequest
                | IcmpType::AddressMaskReply
        );
        let (identifier, seq) = id_and_seq(data, has_id);

        let layer = IcmpLayer {
            version: IcmpVersion::Icmpv4,
            icmp_type: icmp_type.into(),
            icmp_code: IcmpCode::from_parts(raw_type, raw_code).into(),
            identifier,
            seq,
            checksum_valid: Some(
                checksum_with_zeroed_field(data, CHECKSUM_OFFSET, 0) == checksum,
            ),
        };

        // ICMP doesn't have child protocols
        Ok(ParseResult::new(
            LayerData::Icmp(layer),
            data.len(),
            &data[HEADER_LEN..],
        ))
    }

    fn schema_fields(&self) -> Vec<FieldDescriptor> {
        icmp_schema_fields("IcmpType", "IcmpCode")
    }
}
