//! DHCP protocol parser.
//!
//! Parses DHCP (Dynamic Host Configuration Protocol) messages used for
//! network configuration. Matches on UDP ports 67/68 and the DHCP magic cookie.

use super::{FieldValue, ParseContext, ParseResult, Protocol};
use crate::error::ProtocolError;
use crate::record::{LayerData, LayerFields, StackLevel};
use crate::schema::{DataKind, FieldDescriptor};

/// DHCP server port.
pub const DHCP_SERVER_PORT: u16 = 67;

/// DHCP client port.
pub const DHCP_CLIENT_PORT: u16 = 68;

/// DHCP magic cookie (0x63825363).
const DHCP_MAGIC_COOKIE: [u8; 4] = [0x63, 0x82, 0x53, 0x63];

/// BOOTP header size, up to the magic cookie.
const BOOTP_HEADER_SIZE: usize = 236;

/// Offset of the first option, after the cookie.
const OPTIONS_OFFSET: usize = BOOTP_HEADER_SIZE + 4;

/// DHCP option codes this parser extracts.
pub mod option {
    pub const PAD: u8 = 0;
    pub const ROUTER: u8 = 3;
    pub const NAME_SERVER: u8 = 6;
    pub const HOSTNAME: u8 = 12;
    pub const DOMAIN: u8 = 15;
    pub const MESSAGE_TYPE: u8 = 53;
    pub const SERVER_ID: u8 = 54;
    pub const END: u8 = 255;
}

crate::enum_property! {
    /// BOOTP operation codes.
    pub enum BootpOpCode: u8 {
        BootRequest = 1 => "BOOTREQUEST",
        BootReply = 2 => "BOOTREPLY",
    }
}

crate::enum_property! {
    /// DHCP message types (option 53).
    pub enum DhcpMessageType: u8 {
        Discover = 1 => "DHCPDISCOVER",
        Offer = 2 => "DHCPOFFER",
        Request = 3 => "DHCPREQUEST",
        Decline = 4 => "DHCPDECLINE",
        Ack = 5 => "DHCPACK",
        Nak = 6 => "DHCPNAK",
        Release = 7 => "DHCPRELEASE",
        Inform = 8 => "DHCPINFORM",
    }
}

/// Decoded DHCP message. Absent options are empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DhcpLayer {
    pub operation: BootpOpCode,
    pub message_type: DhcpMessageType,
    pub transaction_id: u32,
    pub client_ip_current: String,
    pub client_ip_assigned: String,
    pub client_mac: String,
    pub client_hostname: String,
    pub server_ip: String,
    pub server_hostname: String,
    pub server_id: String,
    pub domain: String,
    pub name_server: String,
    pub router: String,
}

impl LayerFields for DhcpLayer {
    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        let text = |s: &String| FieldValue::string(s.as_str());
        vec![
            ("operation", self.operation.into()),
            ("message_type", self.message_type.into()),
            ("transaction_id", FieldValue::UInt32(self.transaction_id)),
            ("client_ip_current", text(&self.client_ip_current)),
            ("client_ip_assigned", text(&self.client_ip_assigned)),
            ("client_mac", text(&self.client_mac)),
            ("client_hostname", text(&self.client_hostname)),
            ("server_ip", text(&self.server_ip)),
            ("server_hostname", text(&self.server_hostname)),
            ("server_id", text(&self.server_id)),
            ("domain", text(&self.domain)),
            ("name_server", text(&self.name_server)),
            ("router", text(&self.router)),
        ]
    }
}

/// Format an IP address from 4 bytes.
fn format_ip(bytes: &[u8]) -> String {
    if bytes.len() >= 4 {
        FieldValue::ipv4(&bytes[..4]).to_string()
    } else {
        String::new()
    }
}

/// Client hardware address with NUL bytes stripped from both ends.
fn format_chaddr(chaddr: &[u8]) -> String {
    let start = chaddr.iter().position(|&b| b != 0);
    let end = chaddr.iter().rposition(|&b| b != 0);
    match (start, end) {
        (Some(start), Some(end)) => super::format_hw_addr(&chaddr[start..=end]),
        _ => String::new(),
    }
}

/// Text up to the first NUL.
fn format_text(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// Options of interest, as raw values.
#[derive(Debug, Default)]
struct DhcpOptions<'a> {
    message_type: Option<u8>,
    hostname: Option<&'a [u8]>,
    domain: Option<&'a [u8]>,
    name_server: Option<&'a [u8]>,
    router: Option<&'a [u8]>,
    server_id: Option<&'a [u8]>,
}

/// Walk the option list. Stops at End or at the first truncated option.
fn parse_dhcp_options(data: &[u8]) -> DhcpOptions<'_> {
    let mut options = DhcpOptions::default();
    let mut offset = 0;

    while offset < data.len() {
        let code = data[offset];

        if code == option::PAD {
            offset += 1;
            continue;
        }
        if code == option::END {
            break;
        }

        let Some(&len) = data.get(offset + 1) else {
            break;
        };
        let Some(value) = data.get(offset + 2..offset + 2 + len as usize) else {
            break;
        };

        match code {
            option::MESSAGE_TYPE if len == 1 => options.message_type = Some(value[0]),
            option::HOSTNAME => options.hostname = Some(value),
            option::DOMAIN => options.domain = Some(value),
            // First address only when several are listed
            option::NAME_SERVER => options.name_server = Some(value),
            option::ROUTER => options.router = Some(value),
            option::SERVER_ID => options.server_id = Some(value),
            _ => {}
        }

        offset += 2 + len as usize;
    }

    options
}

/// DHCP protocol parser.
#[derive(Debug, Clone, Copy)]
pub struct DhcpProtocol;

impl Protocol for DhcpProtocol {
    fn name(&self) -> &'static str {
        "DHCP"
    }

    fn level(&self) -> StackLevel {
        StackLevel::Application
    }

    /// Requires both the BOOTP header and the DHCP options cookie.
    fn can_parse(&self, data: &[u8], context: &ParseContext) -> bool {
        (context.has_port(DHCP_SERVER_PORT) || context.has_port(DHCP_CLIENT_PORT))
            && data.get(BOOTP_HEADER_SIZE..OPTIONS_OFFSET) == Some(&DHCP_MAGIC_COOKIE[..])
    }

    fn parse<'a>(
        &self,
        data: &'a [u8],
        _context: &ParseContext,
    ) -> Result<ParseResult<'a>, ProtocolError> {
        if data.len() < OPTIONS_OFFSET {
            return Err(ProtocolError::PacketTooShort {
                protocol: "DHCP",
                needed: OPTIONS_OFFSET,
                have: data.len(),
            });
        }
        if data[BOOTP_HEADER_SIZE..OPTIONS_OFFSET] != DHCP_MAGIC_COOKIE {
            return Err(ProtocolError::InvalidField {
                protocol: "DHCP",
                field: "magic_cookie",
                reason: "DHCP magic cookie not found (might be BOOTP)".to_string(),
            });
        }

        let options = parse_dhcp_options(&data[OPTIONS_OFFSET..]);
        let text = |value: Option<&[u8]>| value.map(format_text).unwrap_or_default();
        let address = |value: Option<&[u8]>| value.map(format_ip).unwrap_or_default();

        let layer = DhcpLayer {
            operation: BootpOpCode::from_code(data[0]),
            message_type: options
                .message_type
                .map(DhcpMessageType::from_code)
                .unwrap_or(DhcpMessageType::Unknown),
            transaction_id: u32::from_be_bytes([data[4], data[5], data[6], data[7]]),
            client_ip_current: format_ip(&data[12..16]),
            client_ip_assigned: format_ip(&data[16..20]),
            client_mac: format_chaddr(&data[28..44]),
            client_hostname: text(options.hostname),
            server_ip: format_ip(&data[20..24]),
            server_hostname: format_text(&data[44..108]),
            server_id: address(options.server_id),
            domain: text(options.domain),
            name_server: address(options.name_server),
            router: address(options.router),
        };

        // Options run to the end of the datagram
        Ok(ParseResult::new(LayerData::Dhcp(layer), data.len(), &[]))
    }

    fn schema_fields(&self) -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::enumerated("operation", "BootpOpCode"),
            FieldDescriptor::enumerated("message_type", "DhcpMessageType"),
            FieldDescriptor::new("transaction_id", DataKind::UInt32),
            FieldDescriptor::address("client_ip_current"),
            FieldDescriptor::address("client_ip_assigned"),
            FieldDescriptor::address("client_mac"),
            FieldDescriptor::new("client_hostname", DataKind::String),
            FieldDescriptor::address("server_ip"),
            FieldDescriptor::new("server_hostname", DataKind::String),
            FieldDescriptor::address("server_id"),
            FieldDescriptor::new("domain", DataKind::String),
            FieldDescriptor::address("name_server"),
            FieldDescriptor::address("router"),
        ]
    }
}
