//! Protocol registry for managing decoders.

use crate::error::ProtocolError;
use crate::record::StackLevel;
use crate::schema::FieldDescriptor;

use super::{
    ArpProtocol, DhcpProtocol, DnsProtocol, EthernetProtocol, IcmpProtocol, Icmpv6Protocol,
    Ipv4Protocol, Ipv6Protocol, LinuxSllProtocol, ParseContext, ParseResult, TcpProtocol,
    UdpProtocol,
};

/// Core trait all protocol decoders must implement.
pub trait Protocol: Send + Sync {
    /// Layer name this decoder produces (e.g., "TCP", "DNS").
    fn name(&self) -> &'static str;

    /// Human-readable display name.
    fn display_name(&self) -> &'static str {
        self.name()
    }

    /// Stack level this decoder classifies.
    fn level(&self) -> StackLevel;

    /// Whether this protocol is present at this point in the stack.
    fn can_parse(&self, data: &[u8], context: &ParseContext) -> bool;

    /// Decode bytes into a layer.
    fn parse<'a>(
        &self,
        data: &'a [u8],
        context: &ParseContext,
    ) -> Result<ParseResult<'a>, ProtocolError>;

    /// Return the data fields this protocol produces.
    fn schema_fields(&self) -> Vec<FieldDescriptor>;
}

/// Enum of all built-in protocol decoders.
///
/// This enables static dispatch (no vtable overhead) for all built-in protocols.
#[derive(Debug, Clone, Copy)]
pub enum BuiltinProtocol {
    Ethernet(EthernetProtocol),
    LinuxSll(LinuxSllProtocol),
    Ipv4(Ipv4Protocol),
    Ipv6(Ipv6Protocol),
    Arp(ArpProtocol),
    Tcp(TcpProtocol),
    Udp(UdpProtocol),
    Icmp(IcmpProtocol),
    Icmpv6(Icmpv6Protocol),
    Dns(DnsProtocol),
    Dhcp(DhcpProtocol),
}

/// Macro to delegate Protocol trait methods to inner types.
macro_rules! delegate_protocol {
    ($self:expr, $method:ident $(, $arg:expr)*) => {
        match $self {
            BuiltinProtocol::Ethernet(p) => p.$method($($arg),*),
            BuiltinProtocol::LinuxSll(p) => p.$method($($arg),*),
            BuiltinProtocol::Ipv4(p) => p.$method($($arg),*),
            BuiltinProtocol::Ipv6(p) => p.$method($($arg),*),
            BuiltinProtocol::Arp(p) => p.$method($($arg),*),
            BuiltinProtocol::Tcp(p) => p.$method($($arg),*),
            BuiltinProtocol::Udp(p) => p.$method($($arg),*),
            BuiltinProtocol::Icmp(p) => p.$method($($arg),*),
            BuiltinProtocol::Icmpv6(p) => p.$method($($arg),*),
            BuiltinProtocol::Dns(p) => p.$method($($arg),*),
            BuiltinProtocol::Dhcp(p) => p.$method($($arg),*),
        }
    };
}

impl Protocol for BuiltinProtocol {
    #[inline]
    fn name(&self) -> &'static str {
        delegate_protocol!(self, name)
    }

    #[inline]
    fn display_name(&self) -> &'static str {
        delegate_protocol!(self, display_name)
    }

    #[inline]
    fn level(&self) -> StackLevel {
        delegate_protocol!(self, level)
    }

    #[inline]
    fn can_parse(&self, data: &[u8], context: &ParseContext) -> bool {
        delegate_protocol!(self, can_parse, data, context)
    }

    #[inline]
    fn parse<'a>(
        &self,
        data: &'a [u8],
        context: &ParseContext,
    ) -> Result<ParseResult<'a>, ProtocolError> {
        delegate_protocol!(self, parse, data, context)
    }

    #[inline]
    fn schema_fields(&self) -> Vec<FieldDescriptor> {
        delegate_protocol!(self, schema_fields)
    }
}

/// Conversion traits for ergonomic registration.
macro_rules! impl_into_builtin {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for BuiltinProtocol {
                fn from(p: $ty) -> Self {
                    BuiltinProtocol::$variant(p)
                }
            }
        )*
    };
}

impl_into_builtin! {
    EthernetProtocol => Ethernet,
    LinuxSllProtocol => LinuxSll,
    Ipv4Protocol => Ipv4,
    Ipv6Protocol => Ipv6,
    ArpProtocol => Arp,
    TcpProtocol => Tcp,
    UdpProtocol => Udp,
    IcmpProtocol => Icmp,
    Icmpv6Protocol => Icmpv6,
    DnsProtocol => Dns,
    DhcpProtocol => Dhcp,
}

/// Registry of decoders, grouped by stack level in precedence order.
///
/// Within a level, decoders are tried in registration order and the first
/// whose [`can_parse`](Protocol::can_parse) accepts the data wins.
#[derive(Debug, Clone, Default)]
pub struct ProtocolRegistry {
    levels: [Vec<BuiltinProtocol>; 4],
}

impl ProtocolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a decoder after those already registered for its level.
    pub fn register<P: Into<BuiltinProtocol>>(&mut self, parser: P) {
        let parser = parser.into();
        self.levels[parser.level().index()].push(parser);
    }

    /// Decoders for a level, in precedence order.
    pub fn parsers(&self, level: StackLevel) -> &[BuiltinProtocol] {
        &self.levels[level.index()]
    }

    /// First decoder at `level` that accepts the data.
    #[inline]
    pub fn find_parser(
        &self,
        level: StackLevel,
        data: &[u8],
        context: &ParseContext,
    ) -> Option<&BuiltinProtocol> {
        self.parsers(level)
            .iter()
            .find(|p| p.can_parse(data, context))
    }

    /// Get all registered decoders across levels.
    pub fn all_parsers(&self) -> impl Iterator<Item = &BuiltinProtocol> {
        self.levels.iter().flatten()
    }

    /// Get a decoder by layer name.
    pub fn get_parser(&self, name: &str) -> Option<&BuiltinProtocol> {
        self.all_parsers().find(|p| p.name() == name)
    }

    pub fn len(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
