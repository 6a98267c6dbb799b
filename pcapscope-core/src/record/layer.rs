//! Stack levels and per-level decoded values.

use std::fmt;
use std::str::FromStr;

use crate::protocol::{
    ArpLayer, DhcpLayer, DnsLayer, EthernetLayer, FieldValue, IcmpLayer, IpLayer, SllLayer,
    TcpLayer, UdpLayer,
};

/// The four protocol levels a frame is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StackLevel {
    Link,
    Network,
    Transport,
    Application,
}

impl StackLevel {
    /// All levels, outermost first.
    pub const ALL: [StackLevel; 4] = [
        StackLevel::Link,
        StackLevel::Network,
        StackLevel::Transport,
        StackLevel::Application,
    ];

    /// Position in [`StackLevel::ALL`].
    pub const fn index(self) -> usize {
        match self {
            StackLevel::Link => 0,
            StackLevel::Network => 1,
            StackLevel::Transport => 2,
            StackLevel::Application => 3,
        }
    }

    /// Column prefix used by flattened rows.
    pub const fn as_str(self) -> &'static str {
        match self {
            StackLevel::Link => "link",
            StackLevel::Network => "network",
            StackLevel::Transport => "transport",
            StackLevel::Application => "application",
        }
    }
}

impl fmt::Display for StackLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}

impl FromStr for StackLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "link" => Ok(StackLevel::Link),
            "network" => Ok(StackLevel::Network),
            "transport" => Ok(StackLevel::Transport),
            "application" => Ok(StackLevel::Application),
            other => Err(format!("unknown stack level: {other}")),
        }
    }
}

/// Ordered view of a protocol layer's data map.
pub trait LayerFields {
    /// Data fields in declaration order. Absent values are `Null`.
    fn fields(&self) -> Vec<(&'static str, FieldValue)>;
}

/// Decoded content of one protocol, one variant per modeled protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerData {
    Ethernet(EthernetLayer),
    Sll(SllLayer),
    Ip(IpLayer),
    Arp(ArpLayer),
    Tcp(TcpLayer),
    Udp(UdpLayer),
    Icmp(IcmpLayer),
    Dns(DnsLayer),
    Dhcp(DhcpLayer),
    Raw,
}

impl LayerData {
    /// Protocol name as it appears in `{level}.layer_name`.
    pub fn protocol_name(&self) -> &'static str {
        match self {
            LayerData::Ethernet(_) => "Ethernet",
            LayerData::Sll(_) => "SLL",
            LayerData::Ip(_) => "IP",
            LayerData::Arp(_) => "ARP",
            LayerData::Tcp(_) => "TCP",
            LayerData::Udp(_) => "UDP",
            LayerData::Icmp(icmp) => icmp.protocol_name(),
            LayerData::Dns(_) => "DNS",
            LayerData::Dhcp(_) => "DHCP",
            LayerData::Raw => "RAW",
        }
    }

    /// Data map in declaration order. Raw layers have none.
    pub fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        match self {
            LayerData::Ethernet(l) => l.fields(),
            LayerData::Sll(l) => l.fields(),
            LayerData::Ip(l) => l.fields(),
            LayerData::Arp(l) => l.fields(),
            LayerData::Tcp(l) => l.fields(),
            LayerData::Udp(l) => l.fields(),
            LayerData::Icmp(l) => l.fields(),
            LayerData::Dns(l) => l.fields(),
            LayerData::Dhcp(l) => l.fields(),
            LayerData::Raw => Vec::new(),
        }
    }

    /// Look up one data field.
    pub fn field(&self, name: &str) -> Option<FieldValue> {
        self.fields()
            .into_iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v)
    }

    /// Checksum verification outcome, for protocols that carry one.
    pub fn checksum_valid(&self) -> Option<bool> {
        match self {
            LayerData::Ip(l) => l.checksum_valid,
            LayerData::Tcp(l) => l.checksum_valid,
            LayerData::Udp(l) => l.checksum_valid,
            LayerData::Icmp(l) => l.checksum_valid,
            _ => None,
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, LayerData::Raw)
    }
}

/// One protocol at one stack level, with byte metering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerValue {
    level: StackLevel,
    size_total: usize,
    size_payload: usize,
    data: LayerData,
}

impl LayerValue {
    /// Create a layer value. The payload size is capped at the total size.
    pub fn new(level: StackLevel, data: LayerData, size_total: usize, size_payload: usize) -> Self {
        Self {
            level,
            size_total,
            size_payload: size_payload.min(size_total),
            data,
        }
    }

    /// Raw placeholder spanning `size` opaque bytes.
    pub fn raw(level: StackLevel, size: usize) -> Self {
        Self::new(level, LayerData::Raw, size, 0)
    }

    pub fn level(&self) -> StackLevel {
        self.level
    }

    pub fn protocol_name(&self) -> &'static str {
        self.data.protocol_name()
    }

    pub fn size_total(&self) -> usize {
        self.size_total
    }

    pub fn size_payload(&self) -> usize {
        self.size_payload
    }

    pub fn data(&self) -> &LayerData {
        &self.data
    }

    pub fn is_raw(&self) -> bool {
        self.data.is_raw()
    }
}

impl fmt::Display for LayerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} {} (total={}, payload={})",
            self.level,
            self.protocol_name(),
            self.size_total,
            self.size_payload
        )?;
        for (key, value) in self.data.fields() {
            writeln!(f, "    {key}: {value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_order_and_names() {
        assert!(StackLevel::Link < StackLevel::Application);
        assert_eq!(StackLevel::Transport.index(), 2);
        assert_eq!(StackLevel::Network.as_str(), "network");
        assert_eq!(StackLevel::Network.to_string(), "NETWORK");
        assert_eq!("APPLICATION".parse::<StackLevel>(), Ok(StackLevel::Application));
        assert!("session".parse::<StackLevel>().is_err());
    }

    #[test]
    fn test_payload_capped_at_total() {
        let layer = LayerValue::new(StackLevel::Network, LayerData::Raw, 20, 64);
        assert_eq!(layer.size_total(), 20);
        assert_eq!(layer.size_payload(), 20);
    }

    #[test]
    fn test_raw_layer() {
        let layer = LayerValue::raw(StackLevel::Application, 42);
        assert!(layer.is_raw());
        assert_eq!(layer.protocol_name(), "RAW");
        assert_eq!(layer.size_total(), 42);
        assert_eq!(layer.size_payload(), 0);
        assert!(layer.data().fields().is_empty());
    }

    #[test]
    fn test_structural_equality() {
        let a = LayerValue::raw(StackLevel::Link, 10);
        let b = LayerValue::raw(StackLevel::Link, 10);
        let c = LayerValue::raw(StackLevel::Network, 10);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
