//! DNS protocol parser.

use std::net::{Ipv4Addr, Ipv6Addr};

use super::{FieldValue, ParseContext, ParseResult, Protocol};
use crate::error::ProtocolError;
use crate::record::{LayerData, LayerFields, StackLevel};
use crate::schema::{DataKind, FieldDescriptor};

/// DNS well-known port.
pub const DNS_PORT: u16 = 53;

/// Multicast DNS port.
pub const MDNS_PORT: u16 = 5353;

/// Fixed DNS header size.
const HEADER_LEN: usize = 12;

/// Upper bound on compression pointer jumps while reading one name.
const MAX_POINTER_JUMPS: usize = 64;

crate::enum_property! {
    /// Query/response flag (QR bit).
    pub enum DnsDirection: u8 {
        Query = 0 => "QUERY",
        Response = 1 => "RESPONSE",
    }
}

crate::enum_property! {
    /// DNS operation codes (RFC 1035, RFC 1996, RFC 2136, RFC 8490).
    pub enum DnsOpCode: u8 {
        Query = 0 => "QUERY",
        IQuery = 1 => "IQUERY",
        Status = 2 => "STATUS",
        Notify = 4 => "NOTIFY",
        Update = 5 => "UPDATE",
        Stateful = 6 => "STATEFUL",
    }
}

crate::enum_property! {
    /// DNS response codes.
    pub enum DnsRCode: u8 {
        NoError = 0 => "NOERROR",
        FormErr = 1 => "FORMERR",
        ServFail = 2 => "SERVFAIL",
        NxDomain = 3 => "NXDOMAIN",
        NotImp = 4 => "NOTIMP",
        Refused = 5 => "REFUSED",
        YxDomain = 6 => "YXDOMAIN",
        YxRrSet = 7 => "YXRRSET",
        NxRrSet = 8 => "NXRRSET",
        NotAuth = 9 => "NOTAUTH",
        NotZone = 10 => "NOTZONE",
    }
}

crate::enum_property! {
    /// DNS record types (IANA registry).
    pub enum DnsQType: u16 {
        A = 1 => "A",
        Ns = 2 => "NS",
        Md = 3 => "MD",
        Mf = 4 => "MF",
        Cname = 5 => "CNAME",
        Soa = 6 => "SOA",
        Mb = 7 => "MB",
        Mg = 8 => "MG",
        Mr = 9 => "MR",
        Null = 10 => "NULL",
        Wks = 11 => "WKS",
        Ptr = 12 => "PTR",
        Hinfo = 13 => "HINFO",
        Minfo = 14 => "MINFO",
        Mx = 15 => "MX",
        Txt = 16 => "TXT",
        Rp = 17 => "RP",
        Afsdb = 18 => "AFSDB",
        X25 = 19 => "X25",
        Isdn = 20 => "ISDN",
        Rt = 21 => "RT",
        Nsap = 22 => "NSAP",
        NsapPtr = 23 => "NSAP_PTR",
        Sig = 24 => "SIG",
        Key = 25 => "KEY",
        Px = 26 => "PX",
        Gpos = 27 => "GPOS",
        Aaaa = 28 => "AAAA",
        Loc = 29 => "LOC",
        Nxt = 30 => "NXT",
        Eid = 31 => "EID",
        Nimloc = 32 => "NIMLOC",
        Srv = 33 => "SRV",
        Atma = 34 => "ATMA",
        Naptr = 35 => "NAPTR",
        Kx = 36 => "KX",
        Cert = 37 => "CERT",
        A6 = 38 => "A6",
        Dname = 39 => "DNAME",
        Sink = 40 => "SINK",
        Opt = 41 => "OPT",
        Apl = 42 => "APL",
        Ds = 43 => "DS",
        Sshfp = 44 => "SSHFP",
        Ipseckey = 45 => "IPSECKEY",
        Rrsig = 46 => "RRSIG",
        Nsec = 47 => "NSEC",
        Dnskey = 48 => "DNSKEY",
        Dhcid = 49 => "DHCID",
        Nsec3 = 50 => "NSEC3",
        Nsec3Param = 51 => "NSEC3PARAM",
        Tlsa = 52 => "TLSA",
        Smimea = 53 => "SMIMEA",
        Hip = 55 => "HIP",
        Ninfo = 56 => "NINFO",
        Rkey = 57 => "RKEY",
        Talink = 58 => "TALINK",
        Cds = 59 => "CDS",
        Cdnskey = 60 => "CDNSKEY",
        Openpgpkey = 61 => "OPENPGPKEY",
        Csync = 62 => "CSYNC",
        Zonemd = 63 => "ZONEMD",
        Svcb = 64 => "SVCB",
        Https = 65 => "HTTPS",
        Any = 255 => "ANY",
    }
}

/// One resource record from the answer section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsAnswer {
    pub rrname: String,
    pub rtype: DnsQType,
    pub rclass: u16,
    pub ttl: u32,
    pub rdlen: u16,
    /// Rendered record data: addresses, names, TXT text, otherwise hex.
    pub rdata: String,
}

impl DnsAnswer {
    fn to_record(&self) -> FieldValue {
        FieldValue::Record(vec![
            ("rrname".into(), FieldValue::string(self.rrname.as_str())),
            ("type".into(), self.rtype.into()),
            ("rclass".into(), FieldValue::UInt16(self.rclass)),
            ("ttl".into(), FieldValue::UInt32(self.ttl)),
            ("rdlen".into(), FieldValue::UInt16(self.rdlen)),
            ("rdata".into(), FieldValue::string(self.rdata.as_str())),
        ])
    }
}

/// Decoded DNS message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsLayer {
    pub transaction_id: u16,
    pub direction: DnsDirection,
    pub opcode: DnsOpCode,
    /// Type of the first question, if there is one.
    pub qtype: Option<DnsQType>,
    /// Responses only.
    pub rcode: Option<DnsRCode>,
    /// Name of the first question, if there is one.
    pub qname: Option<String>,
    /// Responses with at least one answer only.
    pub answers: Option<Vec<DnsAnswer>>,
}

impl LayerFields for DnsLayer {
    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        let answers = match &self.answers {
            Some(answers) => FieldValue::List(answers.iter().map(DnsAnswer::to_record).collect()),
            None => FieldValue::Null,
        };

        vec![
            ("transaction_id", FieldValue::UInt16(self.transaction_id)),
            ("direction", self.direction.into()),
            ("opcode", self.opcode.into()),
            ("qtype", FieldValue::optional(self.qtype)),
            ("rcode", FieldValue::optional(self.rcode)),
            ("qname", FieldValue::optional(self.qname.as_deref())),
            ("answers", answers),
        ]
    }
}

fn malformed(field: &'static str, reason: impl Into<String>) -> ProtocolError {
    ProtocolError::InvalidField {
        protocol: "DNS",
        field,
        reason: reason.into(),
    }
}

fn read_u16_at(message: &[u8], pos: usize, field: &'static str) -> Result<u16, ProtocolError> {
    super::checksum::read_u16(message, pos).ok_or_else(|| malformed(field, "truncated"))
}

fn read_u32_at(message: &[u8], pos: usize, field: &'static str) -> Result<u32, ProtocolError> {
    message
        .get(pos..pos + 4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| malformed(field, "truncated"))
}

/// Read a possibly compressed domain name starting at `pos`.
/// Returns (decoded_name, position after the name in the original stream).
fn read_name(message: &[u8], mut pos: usize) -> Result<(String, usize), ProtocolError> {
    let mut labels: Vec<String> = Vec::with_capacity(4);
    let mut resume = None;
    let mut jumps = 0;

    loop {
        let len = *message
            .get(pos)
            .ok_or_else(|| malformed("name", "unexpected end of data"))? as usize;

        if len == 0 {
            pos += 1;
            break;
        }

        // Compression pointer (top 2 bits set)
        if len & 0xC0 == 0xC0 {
            let low = *message
                .get(pos + 1)
                .ok_or_else(|| malformed("name", "truncated pointer"))? as usize;
            jumps += 1;
            if jumps > MAX_POINTER_JUMPS {
                return Err(malformed("name", "compression loop"));
            }
            resume.get_or_insert(pos + 2);
            pos = ((len & 0x3F) << 8) | low;
            continue;
        }

        if len > 63 {
            return Err(malformed("name", format!("invalid label length: {len}")));
        }

        let label = message
            .get(pos + 1..pos + 1 + len)
            .ok_or_else(|| malformed("name", "label extends beyond data"))?;
        labels.push(String::from_utf8_lossy(label).into_owned());
        pos += 1 + len;
    }

    let name = if labels.is_empty() {
        ".".to_string()
    } else {
        labels.join(".")
    };

    Ok((name, resume.unwrap_or(pos)))
}

/// Render record data by type.
fn render_rdata(
    message: &[u8],
    rtype: DnsQType,
    start: usize,
    rdata: &[u8],
) -> Result<String, ProtocolError> {
    let rendered = match (rtype, rdata.len()) {
        (DnsQType::A, 4) => Ipv4Addr::new(rdata[0], rdata[1], rdata[2], rdata[3]).to_string(),
        (DnsQType::Aaaa, 16) => {
            let mut octets = [0u8; 16];
            octets.copy_from_slice(rdata);
            Ipv6Addr::from(octets).to_string()
        }
        (DnsQType::Ns | DnsQType::Cname | DnsQType::Ptr | DnsQType::Dname, _) => {
            read_name(message, start)?.0
        }
        (DnsQType::Mx, len) if len > 2 => {
            let preference = u16::from_be_bytes([rdata[0], rdata[1]]);
            format!("{preference} {}", read_name(message, start + 2)?.0)
        }
        (DnsQType::Txt, _) => {
            let mut segments = Vec::new();
            let mut pos = 0;
            while let Some(&len) = rdata.get(pos) {
                let end = (pos + 1 + len as usize).min(rdata.len());
                segments.push(String::from_utf8_lossy(&rdata[pos + 1..end]).into_owned());
                pos = end;
            }
            segments.join(" ")
        }
        _ => rdata.iter().map(|b| format!("{b:02x}")).collect(),
    };
    Ok(rendered)
}

/// Read one question entry at `pos`: name, type and the position after QCLASS.
fn read_question(message: &[u8], pos: usize) -> Result<(String, DnsQType, usize), ProtocolError> {
    let (name, next) = read_name(message, pos)?;
    let qtype = DnsQType::from_code(read_u16_at(message, next, "qtype")?);
    read_u16_at(message, next + 2, "qclass")?;
    Ok((name, qtype, next + 4))
}

/// Read up to `count` resource records starting at `pos` into `answers`.
///
/// Stops at the first record that cannot be decoded; the records before it
/// are kept.
fn read_answers(
    message: &[u8],
    mut pos: usize,
    count: u16,
    answers: &mut Vec<DnsAnswer>,
) -> Result<(), ProtocolError> {
    for _ in 0..count {
        let (rrname, next) = read_name(message, pos)?;
        let rtype = DnsQType::from_code(read_u16_at(message, next, "type")?);
        let rclass = read_u16_at(message, next + 2, "rclass")?;
        let ttl = read_u32_at(message, next + 4, "ttl")?;
        let rdlen = read_u16_at(message, next + 8, "rdlen")?;

        let start = next + 10;
        let end = start + rdlen as usize;
        let rdata = message
            .get(start..end)
            .ok_or_else(|| malformed("rdata", "extends beyond data"))?;

        answers.push(DnsAnswer {
            rrname,
            rtype,
            rclass,
            ttl,
            rdlen,
            rdata: render_rdata(message, rtype, start, rdata)?,
        });
        pos = end;
    }

    Ok(())
}

/// DNS protocol parser.
#[derive(Debug, Clone, Copy)]
pub struct DnsProtocol;

impl Protocol for DnsProtocol {
    fn name(&self) -> &'static str {
        "DNS"
    }

    fn level(&self) -> StackLevel {
        StackLevel::Application
    }

    fn can_parse(&self, data: &[u8], context: &ParseContext) -> bool {
        !data.is_empty() && (context.has_port(DNS_PORT) || context.has_port(MDNS_PORT))
    }

    fn parse<'a>(
        &self,
        data: &'a [u8],
        context: &ParseContext,
    ) -> Result<ParseResult<'a>, ProtocolError> {
        // DNS over TCP prefixes each message with its length
        let message = if context.parent_protocol == Some("TCP") {
            let len = read_u16_at(data, 0, "length")? as usize;
            let body = &data[2..];
            &body[..len.min(body.len())]
        } else {
            data
        };

        if message.len() < HEADER_LEN {
            return Err(ProtocolError::PacketTooShort {
                protocol: "DNS",
                needed: HEADER_LEN,
                have: message.len(),
            });
        }

        let transaction_id = u16::from_be_bytes([message[0], message[1]]);
        let flags = u16::from_be_bytes([message[2], message[3]]);
        let qdcount = u16::from_be_bytes([message[4], message[5]]);
        let ancount = u16::from_be_bytes([message[6], message[7]]);

        let direction = DnsDirection::from_code((flags >> 15) as u8);
        let opcode = DnsOpCode::from_code(((flags >> 11) & 0x0F) as u8);

        // Sections are decoded best-effort: the header is always kept
        let mut error = None;
        let mut pos = HEADER_LEN;
        let mut question = None;
        for _ in 0..qdcount {
            match read_question(message, pos) {
                Ok((name, code, next)) => {
                    question.get_or_insert((name, code));
                    pos = next;
                }
                Err(e) => {
                    error = Some(e);
                    break;
                }
            }
        }
        let (qname, qtype) = question.unzip();

        let (rcode, answers) = if direction == DnsDirection::Response {
            let rcode = DnsRCode::from_code((flags & 0x0F) as u8);
            let mut answers = Vec::new();
            // Without the question section's end the answers cannot be located
            if error.is_none() {
                error = read_answers(message, pos, ancount, &mut answers).err();
            }
            (Some(rcode), Some(answers).filter(|a| !a.is_empty()))
        } else {
            (None, None)
        };

        let layer = DnsLayer {
            transaction_id,
            direction,
            opcode,
            qtype,
            rcode,
            qname,
            answers,
        };

        // DNS carries no payload protocol
        Ok(ParseResult::new(LayerData::Dns(layer), data.len(), &[]).with_error(error))
    }

    fn schema_fields(&self) -> Vec<FieldDescriptor> {
        let list = |kind: DataKind| DataKind::List(Box::new(kind));
        vec![
            FieldDescriptor::new("transaction_id", DataKind::UInt16),
            FieldDescriptor::enumerated("direction", "DnsDirection"),
            FieldDescriptor::enumerated("opcode", "DnsOpCode"),
            FieldDescriptor::enumerated("qtype", "DnsQType").set_nullable(true),
            FieldDescriptor::enumerated("rcode", "DnsRCode").set_nullable(true),
            FieldDescriptor::nullable("qname", DataKind::String),
            FieldDescriptor::nullable("answers.rrname", list(DataKind::String)),
            FieldDescriptor::nullable("answers.type", list(DataKind::Enumerated("DnsQType"))),
            FieldDescriptor::nullable("answers.rclass", list(DataKind::UInt16)),
            FieldDescriptor::nullable("answers.ttl", list(DataKind::UInt32)),
            FieldDescriptor::nullable("answers.rdlen", list(DataKind::UInt16)),
            FieldDescriptor::nullable("answers.rdata", list(DataKind::String)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dns_context(parent: &'static str) -> ParseContext {
        let mut context = ParseContext::new(1);
        context.parent_protocol = Some(parent);
        context.insert_hint("src_port", 50000);
        context.insert_hint("dst_port", DNS_PORT as u64);
        context
    }

    /// Encode a domain name in DNS format.
    fn encode_domain_name(name: &str) -> Vec<u8> {
        let mut result = Vec::new();
        for part in name.split('.') {
            if !part.is_empty() {
                result.push(part.len() as u8);
                result.extend_from_slice(part.as_bytes());
            }
        }
        result.push(0); // Null terminator
        result
    }

    fn create_dns_query(transaction_id: u16, name: &str, qtype: u16) -> Vec<u8> {
        let mut packet = Vec::new();
        packet.extend_from_slice(&transaction_id.to_be_bytes());
        packet.extend_from_slice(&[0x01, 0x00]); // Standard query, RD
        packet.extend_from_slice(&[0x00, 0x01]); // QDCOUNT
        packet.extend_from_slice(&[0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
        packet.extend_from_slice(&encode_domain_name(name));
        packet.extend_from_slice(&qtype.to_be_bytes());
        packet.extend_from_slice(&[0x00, 0x01]); // IN
        packet
    }

    /// Response to "www.example.com" A with a CNAME and an A answer,
    /// both owner names compressed.
    fn create_dns_response(rcode: u8) -> Vec<u8> {
        let mut packet = Vec::new();
        packet.extend_from_slice(&[0xbe, 0xef]);
        let flags = 0x8180u16 | rcode as u16;
        packet.extend_from_slice(&flags.to_be_bytes());
        packet.extend_from_slice(&[0x00, 0x01, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00]);
        packet.extend_from_slice(&encode_domain_name("www.example.com"));
        packet.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);

        // CNAME: www.example.com -> web.example.com (suffix compressed to offset 16)
        packet.extend_from_slice(&[0xc0, 0x0c, 0x00, 0x05, 0x00, 0x01]);
        packet.extend_from_slice(&300u32.to_be_bytes());
        packet.extend_from_slice(&[0x00, 0x06, 0x03, b'w', b'e', b'b', 0xc0, 0x10]);

        // A: www.example.com -> 93.184.216.34
        packet.extend_from_slice(&[0xc0, 0x0c, 0x00, 0x01, 0x00, 0x01]);
        packet.extend_from_slice(&60u32.to_be_bytes());
        packet.extend_from_slice(&[0x00, 0x04, 93, 184, 216, 34]);
        packet
    }

    #[test]
    fn test_parse_dns_query() {
        let packet = create_dns_query(0x1234, "www.google.com", 1);

        let result = DnsProtocol.parse(&packet, &dns_context("UDP")).unwrap();

        assert!(result.is_ok());
        assert_eq!(result.get("transaction_id"), Some(FieldValue::UInt16(0x1234)));
        assert_eq!(result.get("direction"), Some(DnsDirection::Query.into()));
        assert_eq!(result.get("opcode"), Some(DnsOpCode::Query.into()));
        assert_eq!(result.get("qtype"), Some(DnsQType::A.into()));
        assert_eq!(result.get("qname"), Some(FieldValue::string("www.google.com")));
        // Queries carry neither rcode nor answers
        assert_eq!(result.get("rcode"), Some(FieldValue::Null));
        assert_eq!(result.get("answers"), Some(FieldValue::Null));
        assert_eq!(result.size_total, packet.len());
        assert_eq!(result.size_payload(), 0);
    }

    #[test]
    fn test_parse_dns_response_with_compression() {
        let packet = create_dns_response(0);

        let result = DnsProtocol.parse(&packet, &dns_context("UDP")).unwrap();

        assert_eq!(result.get("direction"), Some(DnsDirection::Response.into()));
        assert_eq!(result.get("rcode"), Some(DnsRCode::NoError.into()));

        let LayerData::Dns(dns) = &result.data else {
            panic!("expected DNS layer");
        };
        let answers = dns.answers.as_ref().unwrap();
        assert_eq!(answers.len(), 2);
        assert_eq!(answers[0].rrname, "www.example.com");
        assert_eq!(answers[0].rtype, DnsQType::Cname);
        assert_eq!(answers[0].rdata, "web.example.com");
        assert_eq!(answers[0].ttl, 300);
        assert_eq!(answers[1].rdata, "93.184.216.34");
        assert_eq!(answers[1].rdlen, 4);
    }

    #[test]
    fn test_parse_dns_nxdomain_without_answers() {
        let mut packet = create_dns_response(3);
        packet[7] = 0; // ANCOUNT = 0
        packet.truncate(HEADER_LEN + 17 + 4);

        let result = DnsProtocol.parse(&packet, &dns_context("UDP")).unwrap();

        assert_eq!(result.get("rcode"), Some(DnsRCode::NxDomain.into()));
        assert_eq!(result.get("answers"), Some(FieldValue::Null));
    }

    #[test]
    fn test_dns_over_tcp_length_prefix() {
        let message = create_dns_query(7, "example.org", 28);
        let mut packet = (message.len() as u16).to_be_bytes().to_vec();
        packet.extend_from_slice(&message);

        let result = DnsProtocol.parse(&packet, &dns_context("TCP")).unwrap();

        assert_eq!(result.get("transaction_id"), Some(FieldValue::UInt16(7)));
        assert_eq!(result.get("qtype"), Some(DnsQType::Aaaa.into()));
        assert_eq!(result.size_total, message.len() + 2);
    }

    #[test]
    fn test_unassigned_opcode_is_unknown() {
        let mut packet = create_dns_query(1, "a.b", 1);
        packet[2] = 0x18; // opcode 3
        let result = DnsProtocol.parse(&packet, &dns_context("UDP")).unwrap();
        assert_eq!(result.get("opcode"), Some(DnsOpCode::Unknown.into()));
    }

    #[test]
    fn test_pointer_loop_keeps_header() {
        let mut packet = create_dns_query(1, "", 1);
        // Replace the root name with a pointer to itself
        packet[HEADER_LEN] = 0xc0;
        packet.insert(HEADER_LEN + 1, HEADER_LEN as u8);

        let result = DnsProtocol.parse(&packet, &dns_context("UDP")).unwrap();

        assert!(matches!(
            result.error,
            Some(ProtocolError::InvalidField { field: "name", .. })
        ));
        assert_eq!(result.get("transaction_id"), Some(FieldValue::UInt16(1)));
        assert_eq!(result.get("qname"), Some(FieldValue::Null));
    }

    #[test]
    fn test_truncated_answer_keeps_header_and_question() {
        let mut packet = create_dns_response(0);
        // Second answer (A record) claims 4 bytes of rdata; keep only 2
        packet.truncate(packet.len() - 2);

        let result = DnsProtocol.parse(&packet, &dns_context("UDP")).unwrap();

        assert!(matches!(
            result.error,
            Some(ProtocolError::InvalidField { field: "rdata", .. })
        ));
        assert_eq!(result.get("transaction_id"), Some(FieldValue::UInt16(0xbeef)));
        assert_eq!(result.get("direction"), Some(DnsDirection::Response.into()));
        assert_eq!(result.get("rcode"), Some(DnsRCode::NoError.into()));
        assert_eq!(result.get("qname"), Some(FieldValue::string("www.example.com")));
        assert_eq!(result.get("qtype"), Some(DnsQType::A.into()));

        let LayerData::Dns(dns) = &result.data else {
            panic!("expected DNS layer");
        };
        let answers = dns.answers.as_ref().unwrap();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].rdata, "web.example.com");
    }

    #[test]
    fn test_truncated_question_keeps_header() {
        let mut packet = create_dns_response(0);
        // Cut inside the question name
        packet.truncate(HEADER_LEN + 5);

        let result = DnsProtocol.parse(&packet, &dns_context("UDP")).unwrap();

        assert!(result.error.is_some());
        assert_eq!(result.get("transaction_id"), Some(FieldValue::UInt16(0xbeef)));
        assert_eq!(result.get("qname"), Some(FieldValue::Null));
        assert_eq!(result.get("answers"), Some(FieldValue::Null));
    }

    #[test]
    fn test_txt_rendering() {
        let message = [0u8; 0];
        let rdata = [3, b'a', b'b', b'c', 2, b'd', b'e'];
        assert_eq!(render_rdata(&message, DnsQType::Txt, 0, &rdata).unwrap(), "abc de");
        assert_eq!(render_rdata(&message, DnsQType::Null, 0, &[0xca, 0xfe]).unwrap(), "cafe");
    }

    #[test]
    fn test_can_parse_dns() {
        assert!(DnsProtocol.can_parse(&[0], &dns_context("UDP")));
        // No payload (e.g. a bare TCP ACK on port 53)
        assert!(!DnsProtocol.can_parse(&[], &dns_context("TCP")));

        let mut mdns = ParseContext::new(1);
        mdns.insert_hint("src_port", MDNS_PORT as u64);
        assert!(DnsProtocol.can_parse(&[0], &mdns));

        let mut http = ParseContext::new(1);
        http.insert_hint("dst_port", 80);
        assert!(!DnsProtocol.can_parse(&[0], &http));
    }

    #[test]
    fn test_parse_dns_too_short() {
        let err = DnsProtocol.parse(&[0x12, 0x34], &dns_context("UDP")).unwrap_err();
        assert!(matches!(err, ProtocolError::PacketTooShort { have: 2, .. }));
    }
}
