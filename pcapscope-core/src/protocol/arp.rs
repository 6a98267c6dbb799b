//! ARP protocol parser.

use super::ethernet::ethertype;
use super::{format_hw_addr, FieldValue, ParseContext, ParseResult, Protocol};
use crate::error::ProtocolError;
use crate::record::{LayerData, LayerFields, StackLevel};
use crate::schema::FieldDescriptor;

/// Fixed part of the ARP header, before the addresses.
const ARP_FIXED_LEN: usize = 8;

crate::enum_property! {
    /// ARP operation codes (RFC 826, RFC 903, RFC 1931, RFC 2390).
    pub enum ArpOpCode: u16 {
        Request = 1 => "REQUEST",
        Reply = 2 => "REPLY",
        RarpRequest = 3 => "RARP_REQUEST",
        RarpReply = 4 => "RARP_REPLY",
        DrarpRequest = 5 => "DRARP_REQUEST",
        DrarpReply = 6 => "DRARP_REPLY",
        DrarpError = 7 => "DRARP_ERROR",
        InarpRequest = 8 => "INARP_REQUEST",
        InarpReply = 9 => "INARP_REPLY",
    }
}

crate::enum_property! {
    /// ARP hardware types (IANA registry).
    pub enum HardwareType: u16 {
        Ethernet10Mb = 1 => "ETHERNET_10MB",
        Ethernet3Mb = 2 => "ETHERNET_3MB",
        Ax25 = 3 => "AX_25",
        Proteon = 4 => "PROTEON",
        Chaos = 5 => "CHAOS",
        Ieee802 = 6 => "IEEE802",
        Arcnet = 7 => "ARCNET",
        Hyperchannel = 8 => "HYPERCHANNEL",
        Lanstar = 9 => "LANSTAR",
        Autonet = 10 => "AUTONET",
        LocalTalk = 11 => "LOCALTALK",
        LocalNet = 12 => "LOCALNET",
        UltraLink = 13 => "ULTRA_LINK",
        Smds = 14 => "SMDS",
        FrameRelay = 15 => "FRAME_RELAY",
        AtmJxb2 = 16 => "ATM_JXB2",
        Hdlc = 17 => "HDLC",
        FibreChannel = 18 => "FIBRE_CHANNEL",
        AtmRfc2225 = 19 => "ATM_RFC2225",
        SerialLine = 20 => "SERIAL_LINE",
        AtmBurrows = 21 => "ATM_BURROWS",
        MilStd188220 = 22 => "MIL_STD_188_220",
        Metricom = 23 => "METRICOM",
        Ieee1394 = 24 => "IEEE_1394",
        Mapos = 25 => "MAPOS",
        Twinaxial = 26 => "TWINAXIAL",
        Eui64 = 27 => "EUI_64",
        HipArp = 28 => "HIPARP",
        IpIso78163 = 29 => "IP_ISO_7816_3",
        ArpSec = 30 => "ARPSEC",
        IpsecTunnel = 31 => "IPSEC_TUNNEL",
        Infiniband = 32 => "INFINIBAND",
        Tia102 = 33 => "TIA_102",
        Wiegand = 34 => "WIEGAND",
        PureIp = 35 => "PURE_IP",
        HwExp1 = 36 => "HW_EXP1",
        Hfi = 37 => "HFI",
        UnifiedBus = 38 => "UNIFIED_BUS",
        HwExp2 = 256 => "HW_EXP2",
        AEthernet = 257 => "AETHERNET",
    }
}

/// Decoded ARP message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArpLayer {
    pub hwtype: HardwareType,
    pub opcode: ArpOpCode,
    pub hwsrc: String,
    pub hwdst: String,
    pub psrc: String,
    pub pdst: String,
}

impl LayerFields for ArpLayer {
    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("hwtype", self.hwtype.into()),
            ("opcode", self.opcode.into()),
            ("hwsrc", FieldValue::string(self.hwsrc.as_str())),
            ("hwdst", FieldValue::string(self.hwdst.as_str())),
            ("psrc", FieldValue::string(self.psrc.as_str())),
            ("pdst", FieldValue::string(self.pdst.as_str())),
        ]
    }
}

/// Render a protocol address according to its length.
fn format_protocol_addr(protocol_type: u16, bytes: &[u8]) -> String {
    match (protocol_type, bytes.len()) {
        (ethertype::IPV4, 4) => FieldValue::ipv4(bytes).to_string(),
        (ethertype::IPV6, 16) => FieldValue::ipv6(bytes).to_string(),
        _ => format_hw_addr(bytes),
    }
}

/// ARP protocol parser.
#[derive(Debug, Clone, Copy)]
pub struct ArpProtocol;

impl Protocol for ArpProtocol {
    fn name(&self) -> &'static str {
        "ARP"
    }

    fn level(&self) -> StackLevel {
        StackLevel::Network
    }

    fn can_parse(&self, _data: &[u8], context: &ParseContext) -> bool {
        context.hint("ethertype") == Some(ethertype::ARP as u64)
    }

    fn parse<'a>(
        &self,
        data: &'a [u8],
        _context: &ParseContext,
    ) -> Result<ParseResult<'a>, ProtocolError> {
        if data.len() < ARP_FIXED_LEN {
            return Err(ProtocolError::PacketTooShort {
                protocol: "ARP",
                needed: ARP_FIXED_LEN,
                have: data.len(),
            });
        }

        let hardware_type = u16::from_be_bytes([data[0], data[1]]);
        let protocol_type = u16::from_be_bytes([data[2], data[3]]);
        let hlen = data[4] as usize;
        let plen = data[5] as usize;
        let operation = u16::from_be_bytes([data[6], data[7]]);

        let total = ARP_FIXED_LEN + 2 * (hlen + plen);
        if data.len() < total {
            return Err(ProtocolError::PacketTooShort {
                protocol: "ARP",
                needed: total,
                have: data.len(),
            });
        }

        let sha = ARP_FIXED_LEN;
        let spa = sha + hlen;
        let tha = spa + plen;
        let tpa = tha + hlen;

        let layer = ArpLayer {
            hwtype: HardwareType::from_code(hardware_type),
            opcode: ArpOpCode::from_code(operation),
            hwsrc: format_hw_addr(&data[sha..spa]),
            hwdst: format_hw_addr(&data[tha..tpa]),
            psrc: format_protocol_addr(protocol_type, &data[spa..tha]),
            pdst: format_protocol_addr(protocol_type, &data[tpa..total]),
        };

        // ARP doesn't have payload protocols; whatever follows is link padding
        Ok(ParseResult::new(LayerData::Arp(layer), data.len(), &data[total..]))
    }

    fn schema_fields(&self) -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::enumerated("hwtype", "HardwareType"),
            FieldDescriptor::enumerated("opcode", "ArpOpCode"),
            FieldDescriptor::address("hwsrc"),
            FieldDescriptor::address("hwdst"),
            FieldDescriptor::address("psrc"),
            FieldDescriptor::address("pdst"),
        ]
    }
}
