//! Protocol decoding framework.
//!
//! This module provides:
//! - [`Protocol`] trait for implementing decoders
//! - [`ProtocolRegistry`] holding decoders per stack level in precedence order
//! - Built-in decoders for the modeled protocols
//! - [`enum_property!`](crate::enum_property) types for fixed code spaces
//!
//! ## Supported Protocols
//!
//! | Level | Protocols (precedence order) |
//! |-------|------------------------------|
//! | Link | Ethernet II, Linux cooked capture |
//! | Network | IPv4, IPv6, ARP |
//! | Transport | TCP, UDP, ICMPv4, ICMPv6 |
//! | Application | DNS, DHCP |
//!
//! ## Example
//!
//! ```rust
//! use pcapscope_core::protocol::{default_registry, ParseContext, Protocol};
//! use pcapscope_core::record::StackLevel;
//!
//! let registry = default_registry();
//! let frame: &[u8] = &[
//!     0xff, 0xff, 0xff, 0xff, 0xff, 0xff, // dst mac
//!     0x00, 0x11, 0x22, 0x33, 0x44, 0x55, // src mac
//!     0x08, 0x06,                         // ethertype (ARP)
//! ];
//!
//! let context = ParseContext::new(1); // 1 = Ethernet
//! let parser = registry.find_parser(StackLevel::Link, frame, &context).unwrap();
//! let result = parser.parse(frame, &context).unwrap();
//! assert_eq!(result.hint("ethertype"), Some(0x0806));
//! ```

mod context;
mod field;
mod property;
mod registry;

pub mod checksum;

// Protocol implementations
mod arp;
mod dhcp;
mod dns;
mod ethernet;
mod icmp;
mod icmpv6;
mod ipv4;
mod ipv6;
mod linux_sll;
mod tcp;
mod udp;

// Test utilities (only compiled for tests)
#[cfg(test)]
pub mod test_utils;

pub use context::{HintEntry, ParseContext, ParseResult};
pub use field::{format_hw_addr, FieldValue};
pub use property::{property_type_name, Property, PropertyValue, UNKNOWN_LABEL};
pub use registry::{BuiltinProtocol, Protocol, ProtocolRegistry};

// Re-export protocol implementations
pub use arp::ArpProtocol;
pub use dhcp::DhcpProtocol;
pub use dns::DnsProtocol;
pub use ethernet::EthernetProtocol;
pub use icmp::IcmpProtocol;
pub use icmpv6::Icmpv6Protocol;
pub use ipv4::Ipv4Protocol;
pub use ipv6::Ipv6Protocol;
pub use linux_sll::LinuxSllProtocol;
pub use tcp::TcpProtocol;
pub use udp::UdpProtocol;

// Layer data and enumerated properties
pub use arp::{ArpLayer, ArpOpCode, HardwareType};
pub use dhcp::{BootpOpCode, DhcpLayer, DhcpMessageType};
pub use dns::{DnsAnswer, DnsDirection, DnsLayer, DnsOpCode, DnsQType, DnsRCode};
pub use ethernet::EthernetLayer;
pub use icmp::{IcmpCode, IcmpLayer, IcmpType, IcmpVersion};
pub use icmpv6::{Icmpv6Code, Icmpv6Type};
pub use ipv4::{IpLayer, IpVersion};
pub use linux_sll::{CookedPacketType, SllLayer};
pub use tcp::TcpLayer;
pub use udp::UdpLayer;

// Protocol constants
pub use dhcp::{option as dhcp_option, DHCP_CLIENT_PORT, DHCP_SERVER_PORT};
pub use dns::{DNS_PORT, MDNS_PORT};
pub use ethernet::{ethertype, LINKTYPE_ETHERNET};
pub use icmp::IP_PROTO_ICMP;
pub use icmpv6::IP_PROTO_ICMPV6;
pub use ipv6::next_header;
pub use linux_sll::LINKTYPE_LINUX_SLL;
pub use tcp::IP_PROTO_TCP;
pub use udp::IP_PROTO_UDP;

/// Create a registry with all built-in decoders, in precedence order.
pub fn default_registry() -> ProtocolRegistry {
    let mut registry = ProtocolRegistry::new();

    // Link
    registry.register(EthernetProtocol);
    registry.register(LinuxSllProtocol);

    // Network
    registry.register(Ipv4Protocol);
    registry.register(Ipv6Protocol);
    registry.register(ArpProtocol);

    // Transport
    registry.register(TcpProtocol);
    registry.register(UdpProtocol);
    registry.register(IcmpProtocol);
    registry.register(Icmpv6Protocol);

    // Application
    registry.register(DnsProtocol);
    registry.register(DhcpProtocol);

    registry
}
