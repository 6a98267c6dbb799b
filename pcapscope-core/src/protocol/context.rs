//! Parse context and result types.

use std::net::IpAddr;

use smallvec::SmallVec;

use super::FieldValue;
use crate::error::ProtocolError;
use crate::record::LayerData;

/// Hint entry for child protocol detection: (hint_name, value).
pub type HintEntry = (&'static str, u64);

/// Context passed from one stack level to the next.
#[derive(Debug, Clone)]
pub struct ParseContext {
    /// Link type from the capture header (e.g., 1 = Ethernet).
    pub link_type: u16,

    /// Protocol decoded at the previous level.
    pub parent_protocol: Option<&'static str>,

    /// Protocol-specific hints (e.g., ethertype, IP protocol number, ports).
    pub hints: SmallVec<[HintEntry; 4]>,

    /// Offset into the original frame where the current level's data starts.
    pub offset: usize,

    /// Network-layer source and destination, for transport pseudo-headers.
    pub addresses: Option<(IpAddr, IpAddr)>,
}

impl ParseContext {
    /// Create a new parse context for a frame with the given link type.
    pub fn new(link_type: u16) -> Self {
        Self {
            link_type,
            parent_protocol: None,
            hints: SmallVec::new(),
            offset: 0,
            addresses: None,
        }
    }

    /// Get a hint value by key (linear search, but N is small).
    #[inline]
    pub fn hint(&self, key: &str) -> Option<u64> {
        self.hints.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    /// Insert a hint value (appends, may create duplicates).
    /// Use `set_hint()` if you need to update an existing hint.
    #[inline]
    pub fn insert_hint(&mut self, key: &'static str, value: u64) {
        self.hints.push((key, value));
    }

    /// Set a hint value (updates existing or appends).
    #[inline]
    pub fn set_hint(&mut self, key: &'static str, value: u64) {
        if let Some(entry) = self.hints.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.hints.push((key, value));
        }
    }

    /// Clear all hints (for context reuse).
    #[inline]
    pub fn clear_hints(&mut self) {
        self.hints.clear();
    }

    /// Check if we're at the start of the frame (no parent protocol).
    pub fn is_root(&self) -> bool {
        self.parent_protocol.is_none()
    }

    /// Whether either port hint equals `port`.
    pub fn has_port(&self, port: u16) -> bool {
        self.hint("src_port") == Some(port as u64) || self.hint("dst_port") == Some(port as u64)
    }

    /// Advance past a decoded layer: its hints replace the current ones.
    pub fn descend(&mut self, protocol: &'static str, result: &ParseResult<'_>) {
        self.parent_protocol = Some(protocol);
        self.hints = result.child_hints.clone();
        self.offset += result.header_len();
        if let Some(addresses) = result.addresses {
            self.addresses = Some(addresses);
        }
    }

    /// Advance past a Raw layer: nothing below it can be identified.
    pub fn descend_raw(&mut self, consumed: usize) {
        self.parent_protocol = Some("RAW");
        self.hints.clear();
        self.offset += consumed;
    }
}

/// Result of decoding one protocol layer.
#[derive(Debug, Clone)]
pub struct ParseResult<'data> {
    /// Decoded layer content.
    pub data: LayerData,

    /// Bytes this layer spans, header plus payload.
    pub size_total: usize,

    /// Remaining undecoded bytes (payload for the next level).
    pub remaining: &'data [u8],

    /// Hints for child protocol identification. Typically 2-4 entries.
    pub child_hints: SmallVec<[HintEntry; 4]>,

    /// Source and destination addresses established by this layer.
    pub addresses: Option<(IpAddr, IpAddr)>,

    /// Error that cut decoding short; `data` holds what was decoded before it.
    pub error: Option<ProtocolError>,
}

impl<'data> ParseResult<'data> {
    /// Create a successful parse result.
    pub fn new(data: LayerData, size_total: usize, remaining: &'data [u8]) -> Self {
        Self {
            data,
            size_total,
            remaining,
            child_hints: SmallVec::new(),
            addresses: None,
            error: None,
        }
    }

    /// Builder: record a partial-parse error.
    pub fn with_error(mut self, error: Option<ProtocolError>) -> Self {
        self.error = error;
        self
    }

    /// True if the layer was decoded completely.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Builder: add a child hint.
    pub fn with_hint(mut self, key: &'static str, value: u64) -> Self {
        self.child_hints.push((key, value));
        self
    }

    /// Builder: record network-layer addresses.
    pub fn with_addresses(mut self, src: IpAddr, dst: IpAddr) -> Self {
        self.addresses = Some((src, dst));
        self
    }

    /// Payload size handed to the next level.
    pub fn size_payload(&self) -> usize {
        self.remaining.len()
    }

    /// Bytes consumed by this layer's header.
    pub fn header_len(&self) -> usize {
        self.size_total.saturating_sub(self.remaining.len())
    }

    /// Get a field value by name.
    pub fn get(&self, name: &str) -> Option<FieldValue> {
        self.data.field(name)
    }

    /// Get a child hint value by name.
    pub fn hint(&self, name: &str) -> Option<u64> {
        self.child_hints
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| *v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::LayerData;

    #[test]
    fn test_context_hint_access() {
        let mut ctx = ParseContext::new(1);
        ctx.insert_hint("ip_protocol", 6);
        ctx.insert_hint("dst_port", 80);

        assert_eq!(ctx.hint("ip_protocol"), Some(6));
        assert_eq!(ctx.hint("dst_port"), Some(80));
        assert_eq!(ctx.hint("nonexistent"), None);
        assert!(ctx.has_port(80));
        assert!(!ctx.has_port(53));
    }

    #[test]
    fn test_context_set_hint_update() {
        let mut ctx = ParseContext::new(1);
        ctx.set_hint("ip_protocol", 6);
        ctx.set_hint("ip_protocol", 17); // Update existing

        assert_eq!(ctx.hint("ip_protocol"), Some(17));
        assert_eq!(ctx.hints.len(), 1); // No duplicates
    }

    #[test]
    fn test_context_clear_hints() {
        let mut ctx = ParseContext::new(1);
        ctx.insert_hint("ip_protocol", 6);
        ctx.insert_hint("dst_port", 80);

        ctx.clear_hints();

        assert_eq!(ctx.hints.len(), 0);
        assert_eq!(ctx.hint("ip_protocol"), None);
    }

    #[test]
    fn test_hint_count_stays_inline() {
        let mut ctx = ParseContext::new(1);
        ctx.insert_hint("ethertype", 0x0800);
        ctx.insert_hint("ip_protocol", 6);
        ctx.insert_hint("src_port", 12345);
        ctx.insert_hint("dst_port", 80);

        // Should stay inline (no heap allocation) with 4 entries
        assert!(!ctx.hints.spilled());
    }

    #[test]
    fn test_descend_replaces_hints() {
        let payload = [0u8; 6];
        let result = ParseResult::new(LayerData::Raw, 10, &payload[..])
            .with_hint("ip_protocol", 17)
            .with_addresses("10.0.0.1".parse().unwrap(), "10.0.0.2".parse().unwrap());

        let mut ctx = ParseContext::new(1);
        ctx.insert_hint("ethertype", 0x0800);
        ctx.descend("IP", &result);

        assert_eq!(ctx.parent_protocol, Some("IP"));
        assert_eq!(ctx.hint("ethertype"), None);
        assert_eq!(ctx.hint("ip_protocol"), Some(17));
        assert_eq!(ctx.offset, 4);
        assert!(ctx.addresses.is_some());

        ctx.descend_raw(6);
        assert!(ctx.hints.is_empty());
        assert_eq!(ctx.offset, 10);
        // Addresses survive a raw level
        assert!(ctx.addresses.is_some());
    }

    #[test]
    fn test_parse_result_sizes() {
        let data = [1u8, 2, 3];
        let result = ParseResult::new(LayerData::Raw, 8, &data[..]);
        assert_eq!(result.size_payload(), 3);
        assert_eq!(result.header_len(), 5);
    }

    #[test]
    fn test_parse_result_partial_error() {
        let result = ParseResult::new(LayerData::Raw, 0, &[]);
        assert!(result.is_ok());

        let error = ProtocolError::InvalidField {
            protocol: "DNS",
            field: "rdata",
            reason: "extends beyond data".to_string(),
        };
        let result = result.with_error(Some(error.clone()));
        assert!(!result.is_ok());
        assert_eq!(result.error, Some(error));
    }
}
