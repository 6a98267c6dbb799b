//! Frame builders for decoder and pipeline tests.
//!
//! Every builder fills in valid IPv4, TCP and UDP checksums.

use std::net::{IpAddr, Ipv4Addr};

use super::checksum::{fill_checksum, pseudo_header_sum};
use super::ethertype;

/// Source MAC of every built frame.
pub const SRC_MAC: [u8; 6] = [0x00, 0x11, 0x22, 0x33, 0x44, 0x55];

fn v4(ip: [u8; 4]) -> IpAddr {
    IpAddr::V4(Ipv4Addr::from(ip))
}

/// Broadcast Ethernet frame around `payload`.
pub fn ethernet_frame(ethertype: u16, payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(14 + payload.len());
    frame.extend_from_slice(&[0xff; 6]);
    frame.extend_from_slice(&SRC_MAC);
    frame.extend_from_slice(&ethertype.to_be_bytes());
    frame.extend_from_slice(payload);
    frame
}

/// IPv4 packet with a 20-byte header.
pub fn ipv4_packet(src: [u8; 4], dst: [u8; 4], protocol: u8, payload: &[u8]) -> Vec<u8> {
    let total_length = (20 + payload.len()) as u16;
    let mut packet = vec![0x45, 0x00];
    packet.extend_from_slice(&total_length.to_be_bytes());
    // Identification 1, no fragmentation, TTL 64
    packet.extend_from_slice(&[0x00, 0x01, 0x00, 0x00, 64, protocol, 0x00, 0x00]);
    packet.extend_from_slice(&src);
    packet.extend_from_slice(&dst);
    fill_checksum(&mut packet, 10, 0);
    packet.extend_from_slice(payload);
    packet
}

/// Header-only TCP segment with the given flags.
pub fn tcp_segment(src: [u8; 4], dst: [u8; 4], src_port: u16, dst_port: u16, flags: u8) -> Vec<u8> {
    let mut segment = Vec::with_capacity(20);
    segment.extend_from_slice(&src_port.to_be_bytes());
    segment.extend_from_slice(&dst_port.to_be_bytes());
    segment.extend_from_slice(&1u32.to_be_bytes()); // seq
    segment.extend_from_slice(&0u32.to_be_bytes()); // ack
    segment.extend_from_slice(&[0x50, flags, 0xff, 0xff]); // offset 5, window 65535
    segment.extend_from_slice(&[0x00; 4]); // checksum, urgent pointer

    let pseudo = pseudo_header_sum((v4(src), v4(dst)), 6, segment.len());
    fill_checksum(&mut segment, 16, pseudo);
    segment
}

/// UDP datagram; a computed checksum of zero is sent as 0xffff.
pub fn udp_datagram(
    src: [u8; 4],
    dst: [u8; 4],
    src_port: u16,
    dst_port: u16,
    payload: &[u8],
) -> Vec<u8> {
    let length = (8 + payload.len()) as u16;
    let mut datagram = Vec::with_capacity(length as usize);
    datagram.extend_from_slice(&src_port.to_be_bytes());
    datagram.extend_from_slice(&dst_port.to_be_bytes());
    datagram.extend_from_slice(&length.to_be_bytes());
    datagram.extend_from_slice(&[0x00, 0x00]);
    datagram.extend_from_slice(payload);

    let pseudo = pseudo_header_sum((v4(src), v4(dst)), 17, datagram.len());
    fill_checksum(&mut datagram, 6, pseudo);
    if datagram[6..8] == [0, 0] {
        datagram[6..8].copy_from_slice(&[0xff, 0xff]);
    }
    datagram
}

/// Ethernet/IPv4/TCP frame without payload.
pub fn build_tcp_packet(
    src_ip: [u8; 4],
    dst_ip: [u8; 4],
    src_port: u16,
    dst_port: u16,
    flags: u8,
) -> Vec<u8> {
    let segment = tcp_segment(src_ip, dst_ip, src_port, dst_port, flags);
    ethernet_frame(ethertype::IPV4, &ipv4_packet(src_ip, dst_ip, 6, &segment))
}

/// Ethernet/IPv4/UDP frame carrying `payload`.
pub fn build_udp_packet(
    src_ip: [u8; 4],
    dst_ip: [u8; 4],
    src_port: u16,
    dst_port: u16,
    payload: Vec<u8>,
) -> Vec<u8> {
    let datagram = udp_datagram(src_ip, dst_ip, src_port, dst_port, &payload);
    ethernet_frame(ethertype::IPV4, &ipv4_packet(src_ip, dst_ip, 17, &datagram))
}

/// Minimal DNS query for `name` (A record), with the given transaction id.
pub fn build_dns_query(id: u16, name: &str) -> Vec<u8> {
    let mut message = Vec::new();
    message.extend_from_slice(&id.to_be_bytes());
    message.extend_from_slice(&[0x01, 0x00]); // RD
    message.extend_from_slice(&[0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
    for label in name.split('.') {
        message.push(label.len() as u8);
        message.extend_from_slice(label.as_bytes());
    }
    message.push(0);
    message.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::checksum::internet_checksum;

    #[test]
    fn test_ipv4_header_checksum() {
        let packet = ipv4_packet([10, 0, 0, 1], [10, 0, 0, 2], 6, &[]);

        assert_eq!(packet.len(), 20);
        assert_eq!(packet[9], 6);
        // A correct header sums to zero
        assert_eq!(internet_checksum(&packet), 0);
    }

    #[test]
    fn test_build_tcp_packet_len() {
        let packet = build_tcp_packet([192, 168, 1, 100], [192, 168, 1, 200], 12345, 80, 0x02);
        // Ethernet (14) + IPv4 (20) + TCP (20)
        assert_eq!(packet.len(), 54);
        assert_eq!(&packet[6..12], &SRC_MAC);
    }

    #[test]
    fn test_build_dns_query() {
        let query = build_dns_query(0x1234, "example.com");
        assert_eq!(&query[0..2], &[0x12, 0x34]);
        assert_eq!(query.len(), 12 + 13 + 4);
    }
}
