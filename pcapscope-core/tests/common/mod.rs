//! Capture fixtures shared by the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use etherparse::PacketBuilder;

/// 2023-02-06 20:16:07 UTC
pub const BASE_SECONDS: u32 = 1_675_714_567;

pub const CLIENT_MAC: [u8; 6] = [0x00, 0x21, 0x6a, 0x2d, 0x3b, 0x8e];
pub const SERVER_MAC: [u8; 6] = [0x00, 0x50, 0x56, 0xc0, 0x00, 0x01];
pub const BROADCAST_MAC: [u8; 6] = [0xff; 6];

/// One captured frame: seconds, microseconds, bytes.
pub type Frame = (u32, u32, Vec<u8>);

/// Write a little-endian microsecond pcap file.
pub fn write_pcap(path: &Path, link_type: u32, frames: &[Frame]) {
    let mut out = Vec::new();
    out.extend_from_slice(&0xa1b2c3d4u32.to_le_bytes());
    out.extend_from_slice(&2u16.to_le_bytes());
    out.extend_from_slice(&4u16.to_le_bytes());
    out.extend_from_slice(&0i32.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&65535u32.to_le_bytes());
    out.extend_from_slice(&link_type.to_le_bytes());

    for (seconds, micros, data) in frames {
        out.extend_from_slice(&seconds.to_le_bytes());
        out.extend_from_slice(&micros.to_le_bytes());
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(data);
    }

    fs::write(path, out).unwrap();
}

/// Ethernet/IPv4/UDP frame with valid checksums.
pub fn udp_frame(
    src_mac: [u8; 6],
    dst_mac: [u8; 6],
    src_ip: [u8; 4],
    dst_ip: [u8; 4],
    ports: (u16, u16),
    payload: &[u8],
) -> Vec<u8> {
    let builder = PacketBuilder::ethernet2(src_mac, dst_mac)
        .ipv4(src_ip, dst_ip, 64)
        .udp(ports.0, ports.1);
    let mut frame = Vec::with_capacity(builder.size(payload.len()));
    builder.write(&mut frame, payload).unwrap();
    frame
}

/// Ethernet/IPv4/TCP SYN frame with valid checksums.
pub fn tcp_syn_frame(src_ip: [u8; 4], dst_ip: [u8; 4], ports: (u16, u16)) -> Vec<u8> {
    let builder = PacketBuilder::ethernet2(CLIENT_MAC, SERVER_MAC)
        .ipv4(src_ip, dst_ip, 64)
        .tcp(ports.0, ports.1, 1, 65535)
        .syn();
    let mut frame = Vec::with_capacity(builder.size(0));
    builder.write(&mut frame, &[]).unwrap();
    frame
}

/// UDP frame of exactly `size` bytes to a port no decoder claims.
pub fn sized_udp_frame(size: usize) -> Vec<u8> {
    let payload = vec![0u8; size - 42];
    udp_frame(
        CLIENT_MAC,
        SERVER_MAC,
        [10, 0, 0, 5],
        [10, 0, 0, 9],
        (40000, 9999),
        &payload,
    )
}

/// DNS query message for `name`, type A.
pub fn dns_query(id: u16, name: &str) -> Vec<u8> {
    let mut msg = Vec::new();
    msg.extend_from_slice(&id.to_be_bytes());
    msg.extend_from_slice(&[0x01, 0x00]); // RD
    msg.extend_from_slice(&[0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
    for label in name.split('.') {
        msg.push(label.len() as u8);
        msg.extend_from_slice(label.as_bytes());
    }
    msg.push(0);
    msg.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);
    msg
}

/// DHCP message fields used by the fixtures.
pub struct DhcpMessage<'a> {
    pub op: u8,
    pub message_type: u8,
    pub xid: u32,
    pub yiaddr: [u8; 4],
    pub siaddr: [u8; 4],
    pub hostname: Option<&'a str>,
    pub domain: Option<&'a str>,
    pub server_id: Option<[u8; 4]>,
}

impl DhcpMessage<'_> {
    pub fn encode(&self) -> Vec<u8> {
        let mut msg = vec![0u8; 236];
        msg[0] = self.op;
        msg[1] = 1; // Ethernet
        msg[2] = 6;
        msg[4..8].copy_from_slice(&self.xid.to_be_bytes());
        msg[16..20].copy_from_slice(&self.yiaddr);
        msg[20..24].copy_from_slice(&self.siaddr);
        msg[28..34].copy_from_slice(&CLIENT_MAC);
        msg.extend_from_slice(&[0x63, 0x82, 0x53, 0x63]);

        msg.extend_from_slice(&[53, 1, self.message_type]);
        if let Some(id) = self.server_id {
            msg.extend_from_slice(&[54, 4]);
            msg.extend_from_slice(&id);
        }
        for (code, text) in [(12u8, self.hostname), (15u8, self.domain)] {
            if let Some(text) = text {
                msg.push(code);
                msg.push(text.len() as u8);
                msg.extend_from_slice(text.as_bytes());
            }
        }
        msg.push(255);
        msg
    }
}
