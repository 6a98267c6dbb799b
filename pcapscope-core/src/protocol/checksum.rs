//! Internet checksum recomputation.
//!
//! Verification sums the layer as if its checksum field were zero and compares
//! the result with the transmitted value. The bytes are never copied.

use std::net::IpAddr;

/// Sum 16-bit big-endian words, treating `skip` (a 2-byte field offset) as zero.
fn sum_words(data: &[u8], skip: Option<usize>, mut sum: u64) -> u64 {
    let mut i = 0;

    while i + 1 < data.len() {
        if Some(i) != skip {
            sum += u16::from_be_bytes([data[i], data[i + 1]]) as u64;
        }
        i += 2;
    }

    // Handle odd byte
    if i < data.len() {
        sum += (data[i] as u64) << 8;
    }

    sum
}

/// Fold a running sum into the one's complement checksum.
fn finish(mut sum: u64) -> u16 {
    while sum >> 16 != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }
    !(sum as u16)
}

/// Plain internet checksum over `data`.
pub fn internet_checksum(data: &[u8]) -> u16 {
    finish(sum_words(data, None, 0))
}

/// Checksum over `data` with the 2-byte field at `field_offset` taken as zero.
///
/// `pseudo` is a partial sum from [`pseudo_header_sum`] for protocols that
/// cover a pseudo-header.
pub fn checksum_with_zeroed_field(data: &[u8], field_offset: usize, pseudo: u64) -> u16 {
    finish(sum_words(data, Some(field_offset), pseudo))
}

/// Partial sum of the IPv4 or IPv6 pseudo-header.
pub fn pseudo_header_sum(addresses: (IpAddr, IpAddr), protocol: u8, length: usize) -> u64 {
    let mut sum = 0u64;
    match addresses {
        (IpAddr::V4(src), IpAddr::V4(dst)) => {
            sum = sum_words(&src.octets(), None, sum);
            sum = sum_words(&dst.octets(), None, sum);
            sum += protocol as u64;
            sum += (length as u64) & 0xFFFF;
        }
        (src, dst) => {
            sum = sum_words(&ipv6_octets(src), None, sum);
            sum = sum_words(&ipv6_octets(dst), None, sum);
            let len = length as u32;
            sum += (len >> 16) as u64 + (len & 0xFFFF) as u64;
            sum += protocol as u64;
        }
    }
    sum
}

fn ipv6_octets(addr: IpAddr) -> [u8; 16] {
    match addr {
        IpAddr::V4(v4) => v4.to_ipv6_mapped().octets(),
        IpAddr::V6(v6) => v6.octets(),
    }
}

/// Read the big-endian 16-bit value at `offset`, if in range.
pub fn read_u16(data: &[u8], offset: usize) -> Option<u16> {
    data.get(offset..offset + 2)
        .map(|b| u16::from_be_bytes([b[0], b[1]]))
}

/// Compute and store a checksum into `data` at `field_offset`.
#[cfg(test)]
pub fn fill_checksum(data: &mut [u8], field_offset: usize, pseudo: u64) {
    let value = checksum_with_zeroed_field(data, field_offset, pseudo);
    data[field_offset..field_offset + 2].copy_from_slice(&value.to_be_bytes());
}
