//! PCAP/PCAPNG reader over any `Read` source, built on `pcap_parser`.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use bytes::Bytes;
use pcap_parser::traits::PcapReaderIterator;
use pcap_parser::{LegacyPcapReader, PcapBlockOwned, PcapError as ParserError, PcapNGReader};

use super::RawPacket;
use crate::error::{Error, PcapError};

/// Buffer size for pcap_parser readers (256KB).
const BUFFER_SIZE: usize = 262144;

/// Format of the capture file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PcapFormat {
    /// Classic PCAP (little-endian, microseconds)
    LegacyLeMicro,
    /// Classic PCAP (big-endian, microseconds)
    LegacyBeMicro,
    /// Classic PCAP (little-endian, nanoseconds)
    LegacyLeNano,
    /// Classic PCAP (big-endian, nanoseconds)
    LegacyBeNano,
    /// PCAPNG format
    PcapNg,
}

impl PcapFormat {
    /// Detect the format from the first four bytes of the file.
    pub fn detect(data: &[u8]) -> Result<Self, Error> {
        if data.len() < 4 {
            return Err(Error::Pcap(PcapError::InvalidFormat {
                reason: "Data too small for PCAP magic".into(),
            }));
        }

        match [data[0], data[1], data[2], data[3]] {
            [0xd4, 0xc3, 0xb2, 0xa1] => Ok(PcapFormat::LegacyLeMicro),
            [0xa1, 0xb2, 0xc3, 0xd4] => Ok(PcapFormat::LegacyBeMicro),
            [0x4d, 0x3c, 0xb2, 0xa1] => Ok(PcapFormat::LegacyLeNano),
            [0xa1, 0xb2, 0x3c, 0x4d] => Ok(PcapFormat::LegacyBeNano),
            [0x0a, 0x0d, 0x0d, 0x0a] => Ok(PcapFormat::PcapNg),
            magic => Err(Error::Pcap(PcapError::InvalidFormat {
                reason: format!("Unknown PCAP magic: 0x{:08x}", u32::from_be_bytes(magic)),
            })),
        }
    }

    /// Whether this is a PCAPNG format.
    pub fn is_pcapng(&self) -> bool {
        matches!(self, PcapFormat::PcapNg)
    }

    /// Whether legacy record timestamps carry nanoseconds.
    pub fn is_nanosecond(&self) -> bool {
        matches!(self, PcapFormat::LegacyLeNano | PcapFormat::LegacyBeNano)
    }
}

/// Reader for PCAP and PCAPNG captures.
///
/// # Example
///
/// ```no_run
/// use pcapscope_core::pcap::PcapReader;
///
/// let mut reader = PcapReader::open("capture.pcap")?;
/// while let Some(packet) = reader.next_packet()? {
///     println!("Frame {}: {} bytes", packet.frame_number, packet.data.len());
/// }
/// # Ok::<(), pcapscope_core::Error>(())
/// ```
pub struct PcapReader<R: Read = File> {
    inner: ReaderInner<R>,
    nanosecond: bool,
    frame_number: u64,
    link_type: u16,
}

/// Inner reader using enum dispatch for format-specific handling.
enum ReaderInner<R: Read> {
    Legacy(LegacyPcapReader<BufReader<R>>),
    Ng(PcapNGReader<BufReader<R>>),
}

impl PcapReader<File> {
    /// Open a capture file, detecting its format from the magic number.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let open_error = |e: io::Error| match e.kind() {
            io::ErrorKind::NotFound => Error::Pcap(PcapError::FileNotFound {
                path: path.display().to_string(),
            }),
            _ => Error::Io(e),
        };

        let mut magic = [0u8; 4];
        File::open(path)
            .map_err(open_error)?
            .read_exact(&mut magic)
            .map_err(|e| match e.kind() {
                io::ErrorKind::UnexpectedEof => Error::Pcap(PcapError::InvalidFormat {
                    reason: "File too short to read magic number".to_string(),
                }),
                _ => Error::Io(e),
            })?;
        let format = PcapFormat::detect(&magic)?;

        let file = File::open(path).map_err(open_error)?;
        Self::with_format(file, format)
    }
}

impl<R: Read> PcapReader<R> {
    /// Create a reader with known format.
    pub fn with_format(source: R, format: PcapFormat) -> Result<Self, Error> {
        let buf_reader = BufReader::with_capacity(BUFFER_SIZE, source);

        let inner = if format.is_pcapng() {
            let reader = PcapNGReader::new(BUFFER_SIZE, buf_reader).map_err(|e| {
                Error::Pcap(PcapError::InvalidFormat {
                    reason: format!("Failed to parse PCAPNG: {}", e),
                })
            })?;
            ReaderInner::Ng(reader)
        } else {
            let reader = LegacyPcapReader::new(BUFFER_SIZE, buf_reader).map_err(|e| {
                Error::Pcap(PcapError::InvalidFormat {
                    reason: format!("Failed to parse legacy PCAP: {}", e),
                })
            })?;
            ReaderInner::Legacy(reader)
        };

        Ok(PcapReader {
            inner,
            nanosecond: format.is_nanosecond(),
            frame_number: 0,
            link_type: 1, // Updated from the file or interface header
        })
    }

    /// Link type of the capture (e.g., 1 = Ethernet).
    #[inline]
    pub fn link_type(&self) -> u16 {
        self.link_type
    }

    /// Number of frames read so far.
    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame_number
    }

    /// Read the next packet.
    ///
    /// Returns `Ok(None)` at end of file, and [`PcapError::TruncatedPacket`]
    /// when the file ends partway through a record.
    pub fn next_packet(&mut self) -> Result<Option<RawPacket>, Error> {
        match &mut self.inner {
            ReaderInner::Legacy(reader) => read_legacy_packet(
                reader,
                self.nanosecond,
                &mut self.frame_number,
                &mut self.link_type,
            ),
            ReaderInner::Ng(reader) => {
                read_pcapng_packet(reader, &mut self.frame_number, &mut self.link_type)
            }
        }
    }
}

/// Read next packet from a legacy PCAP reader.
fn read_legacy_packet<S: Read>(
    reader: &mut LegacyPcapReader<S>,
    nanosecond: bool,
    frame_number: &mut u64,
    link_type: &mut u16,
) -> Result<Option<RawPacket>, Error> {
    loop {
        match reader.next() {
            Ok((offset, block)) => match block {
                PcapBlockOwned::Legacy(packet) => {
                    *frame_number += 1;

                    let fraction = if nanosecond {
                        packet.ts_usec as i64 / 1_000
                    } else {
                        packet.ts_usec as i64
                    };
                    let timestamp_us = (packet.ts_sec as i64) * 1_000_000 + fraction;

                    let raw = RawPacket {
                        frame_number: *frame_number,
                        timestamp_us,
                        captured_length: packet.caplen,
                        original_length: packet.origlen,
                        link_type: *link_type,
                        data: Bytes::copy_from_slice(packet.data),
                    };

                    reader.consume(offset);
                    return Ok(Some(raw));
                }
                PcapBlockOwned::LegacyHeader(header) => {
                    *link_type = header.network.0 as u16;
                    reader.consume(offset);
                }
                _ => reader.consume(offset),
            },
            Err(ParserError::Eof) => return Ok(None),
            Err(ParserError::UnexpectedEof) => return Err(truncated(*frame_number)),
            Err(ParserError::Incomplete(_)) => {
                reader.refill().map_err(|e| {
                    Error::Pcap(PcapError::InvalidFormat {
                        reason: format!("Legacy PCAP refill error: {}", e),
                    })
                })?;
            }
            Err(e) => {
                return Err(Error::Pcap(PcapError::InvalidFormat {
                    reason: format!("Legacy PCAP parse error: {}", e),
                }));
            }
        }
    }
}

/// Read next packet from a PCAPNG reader.
fn read_pcapng_packet<S: Read>(
    reader: &mut PcapNGReader<S>,
    frame_number: &mut u64,
    link_type: &mut u16,
) -> Result<Option<RawPacket>, Error> {
    use pcap_parser::pcapng::Block;

    loop {
        match reader.next() {
            Ok((offset, block)) => match block {
                PcapBlockOwned::NG(Block::InterfaceDescription(idb)) => {
                    *link_type = idb.linktype.0 as u16;
                    reader.consume(offset);
                }
                PcapBlockOwned::NG(Block::EnhancedPacket(epb)) => {
                    *frame_number += 1;

                    // Default interface resolution is microseconds
                    let timestamp_us = ((epb.ts_high as i64) << 32) | (epb.ts_low as i64);

                    let packet = RawPacket {
                        frame_number: *frame_number,
                        timestamp_us,
                        captured_length: epb.caplen,
                        original_length: epb.origlen,
                        link_type: *link_type,
                        data: Bytes::copy_from_slice(epb.data),
                    };

                    reader.consume(offset);
                    return Ok(Some(packet));
                }
                PcapBlockOwned::NG(Block::SimplePacket(spb)) => {
                    *frame_number += 1;

                    let packet = RawPacket {
                        frame_number: *frame_number,
                        timestamp_us: 0,
                        captured_length: spb.data.len() as u32,
                        original_length: spb.origlen,
                        link_type: *link_type,
                        data: Bytes::copy_from_slice(spb.data),
                    };

                    reader.consume(offset);
                    return Ok(Some(packet));
                }
                _ => reader.consume(offset),
            },
            Err(ParserError::Eof) => return Ok(None),
            Err(ParserError::UnexpectedEof) => return Err(truncated(*frame_number)),
            Err(ParserError::Incomplete(_)) => {
                reader.refill().map_err(|e| {
                    Error::Pcap(PcapError::InvalidFormat {
                        reason: format!("PCAPNG refill error: {}", e),
                    })
                })?;
            }
            Err(e) => {
                return Err(Error::Pcap(PcapError::InvalidFormat {
                    reason: format!("PCAPNG parse error: {}", e),
                }));
            }
        }
    }
}

fn truncated(frame: u64) -> Error {
    Error::Pcap(PcapError::TruncatedPacket { frame })
}

/// Iterator adapter for PcapReader.
impl<R: Read> Iterator for PcapReader<R> {
    type Item = Result<RawPacket, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_packet().transpose()
    }
}
