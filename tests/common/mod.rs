//! Capture fixtures for the storage and session tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use etherparse::PacketBuilder;

/// 2023-02-06 20:16:07 UTC
pub const BASE_SECONDS: u32 = 1_675_714_567;

const CLIENT_MAC: [u8; 6] = [0x00, 0x21, 0x6a, 0x2d, 0x3b, 0x8e];
const ROUTER_MAC: [u8; 6] = [0x00, 0x50, 0x56, 0xc0, 0x00, 0x01];

/// Write a little-endian microsecond pcap file with Ethernet framing.
pub fn write_pcap(path: &Path, frames: &[(u32, u32, Vec<u8>)]) {
    let mut out = Vec::new();
    out.extend_from_slice(&0xa1b2c3d4u32.to_le_bytes());
    out.extend_from_slice(&2u16.to_le_bytes());
    out.extend_from_slice(&4u16.to_le_bytes());
    out.extend_from_slice(&[0; 8]);
    out.extend_from_slice(&65535u32.to_le_bytes());
    out.extend_from_slice(&1u32.to_le_bytes());

    for (seconds, micros, data) in frames {
        out.extend_from_slice(&seconds.to_le_bytes());
        out.extend_from_slice(&micros.to_le_bytes());
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(data);
    }

    fs::write(path, out).unwrap();
}

fn udp(src: [u8; 4], dst: [u8; 4], ports: (u16, u16), payload: &[u8]) -> Vec<u8> {
    let builder = PacketBuilder::ethernet2(CLIENT_MAC, ROUTER_MAC)
        .ipv4(src, dst, 64)
        .udp(ports.0, ports.1);
    let mut frame = Vec::with_capacity(builder.size(payload.len()));
    builder.write(&mut frame, payload).unwrap();
    frame
}

fn question(msg: &mut Vec<u8>, name: &str) {
    for label in name.split('.') {
        msg.push(label.len() as u8);
        msg.extend_from_slice(label.as_bytes());
    }
    msg.extend_from_slice(&[0, 0x00, 0x01, 0x00, 0x01]);
}

/// DNS query for an A record.
pub fn dns_query_frame(id: u16, name: &str) -> Vec<u8> {
    let mut msg = id.to_be_bytes().to_vec();
    msg.extend_from_slice(&[0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
    question(&mut msg, name);
    udp([10, 0, 0, 5], [8, 8, 8, 8], (50000 + id, 53), &msg)
}

/// DNS response with one A answer pointing back at the question name.
pub fn dns_response_frame(id: u16, name: &str, addr: [u8; 4]) -> Vec<u8> {
    let mut msg = id.to_be_bytes().to_vec();
    msg.extend_from_slice(&[0x81, 0x80, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00]);
    question(&mut msg, name);
    msg.extend_from_slice(&[0xc0, 0x0c, 0x00, 0x01, 0x00, 0x01]);
    msg.extend_from_slice(&300u32.to_be_bytes());
    msg.extend_from_slice(&[0x00, 0x04]);
    msg.extend_from_slice(&addr);
    udp([8, 8, 8, 8], [10, 0, 0, 5], (53, 50000 + id), &msg)
}

/// TCP SYN with valid checksums.
pub fn tcp_syn_frame(dst_port: u16) -> Vec<u8> {
    let builder = PacketBuilder::ethernet2(CLIENT_MAC, ROUTER_MAC)
        .ipv4([10, 0, 0, 5], [93, 184, 216, 34], 64)
        .tcp(41000, dst_port, 7, 64240)
        .syn();
    let mut frame = Vec::with_capacity(builder.size(0));
    builder.write(&mut frame, &[]).unwrap();
    frame
}

/// Four-packet capture mixing DNS and TCP.
pub fn mixed_capture(path: &Path) {
    write_pcap(
        path,
        &[
            (BASE_SECONDS, 0, dns_query_frame(7, "www.example.com")),
            (BASE_SECONDS, 20_000, dns_response_frame(7, "www.example.com", [93, 184, 216, 34])),
            (BASE_SECONDS, 40_000, tcp_syn_frame(443)),
            (BASE_SECONDS + 3, 0, dns_query_frame(8, "mail.example.com")),
        ],
    );
}
