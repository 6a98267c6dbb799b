//! Layer classification pipeline.
//!
//! A [`Classifier`] walks each frame through the four stack levels. At every
//! level it asks the registry for the first decoder that accepts the current
//! payload, runs it, and hands the decoder's remaining bytes to the next level.
//! A level whose payload matches no decoder, or whose decoder rejects the
//! bytes, becomes a Raw layer spanning the rest of the frame; nothing below a
//! Raw layer can be identified, so the remaining levels are empty Raw layers.
//!
//! Classification never fails. Outcomes worth auditing are appended to the
//! classifier's [`Diagnostics`]: unsupported protocols (with a payload
//! preview), decoder errors (with a full hex dump) and checksum mismatches.
//! A decoder that stops partway keeps its layer; the error that stopped it
//! is still logged.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::{Error, PcapError};
use crate::pcap::{PcapReader, RawPacket};
use crate::protocol::{default_registry, ethertype, ParseContext, Protocol, ProtocolRegistry};
use crate::record::{LayerValue, PacketRecord, StackLevel};

/// File name of the unsupported-protocol log.
pub const UNSUPPORTED_LOG: &str = "support.log";
/// File name of the decoder error log.
pub const ERROR_LOG: &str = "error.log";
/// File name of the checksum mismatch log.
pub const CHECKSUM_LOG: &str = "checksum.log";

/// Bytes shown in an unsupported-protocol payload preview.
const PREVIEW_LEN: usize = 32;

/// One diagnostic log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticEntry {
    /// Frame number within its capture.
    pub frame: u64,
    /// Level the entry concerns.
    pub level: StackLevel,
    /// Human-readable description.
    pub message: String,
    /// Hex rendering of the offending bytes, if recorded.
    pub payload: Option<String>,
}

impl fmt::Display for DiagnosticEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame {} [{}] {}", self.frame, self.level, self.message)?;
        if let Some(payload) = &self.payload {
            write!(f, "\n{payload}")?;
        }
        Ok(())
    }
}

/// The three append-only diagnostic logs of a classification run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    unsupported: Vec<DiagnosticEntry>,
    errors: Vec<DiagnosticEntry>,
    checksum: Vec<DiagnosticEntry>,
}

impl Diagnostics {
    /// Payloads no decoder recognized.
    pub fn unsupported(&self) -> &[DiagnosticEntry] {
        &self.unsupported
    }

    /// Decoder failures on recognized protocols.
    pub fn errors(&self) -> &[DiagnosticEntry] {
        &self.errors
    }

    /// Layers whose recomputed checksum did not match.
    pub fn checksum_mismatches(&self) -> &[DiagnosticEntry] {
        &self.checksum
    }

    pub fn is_empty(&self) -> bool {
        self.unsupported.is_empty() && self.errors.is_empty() && self.checksum.is_empty()
    }

    pub fn clear(&mut self) {
        self.unsupported.clear();
        self.errors.clear();
        self.checksum.clear();
    }

    /// Write the three logs into `dir`, replacing any previous run's files.
    pub fn write_to(&self, dir: &Path) -> io::Result<()> {
        fs::create_dir_all(dir)?;
        for (file, entries) in [
            (UNSUPPORTED_LOG, &self.unsupported),
            (ERROR_LOG, &self.errors),
            (CHECKSUM_LOG, &self.checksum),
        ] {
            let mut text = String::new();
            for entry in entries {
                text.push_str(&entry.to_string());
                text.push('\n');
            }
            fs::write(dir.join(file), text)?;
        }
        Ok(())
    }
}

/// Classifies frames into four-level [`PacketRecord`]s.
#[derive(Debug, Clone)]
pub struct Classifier {
    registry: ProtocolRegistry,
    diagnostics: Diagnostics,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier {
    /// Classifier over the built-in decoders.
    pub fn new() -> Self {
        Self::with_registry(default_registry())
    }

    pub fn with_registry(registry: ProtocolRegistry) -> Self {
        Self {
            registry,
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn registry(&self) -> &ProtocolRegistry {
        &self.registry
    }

    /// Diagnostics accumulated since creation or the last [`take_diagnostics`](Self::take_diagnostics).
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Hand over the accumulated diagnostics and start a fresh set.
    pub fn take_diagnostics(&mut self) -> Diagnostics {
        std::mem::take(&mut self.diagnostics)
    }

    /// Classify every frame of a capture file, in capture order.
    ///
    /// A capture cut off inside a record yields the frames before the cut.
    pub fn classify_file(&mut self, path: &Path) -> Result<Vec<PacketRecord>, Error> {
        let reader = PcapReader::open(path)?;
        let mut records = Vec::new();
        for packet in reader {
            match packet {
                Ok(packet) => records.push(self.classify(&packet)),
                Err(Error::Pcap(PcapError::TruncatedPacket { frame })) => {
                    warn!(path = %path.display(), frame, "capture truncated, keeping complete frames");
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        info!(
            path = %path.display(),
            packets = records.len(),
            unsupported = self.diagnostics.unsupported.len(),
            errors = self.diagnostics.errors.len(),
            checksum_mismatches = self.diagnostics.checksum.len(),
            "capture classified"
        );
        Ok(records)
    }

    /// Classify one captured frame.
    pub fn classify(&mut self, packet: &RawPacket) -> PacketRecord {
        self.classify_frame(
            packet.frame_number,
            packet.time(),
            packet.link_type,
            &packet.data,
        )
    }

    /// Classify raw frame bytes captured with the given link type.
    pub fn classify_frame(
        &mut self,
        number: u64,
        time: DateTime<Utc>,
        link_type: u16,
        data: &[u8],
    ) -> PacketRecord {
        let mut context = ParseContext::new(link_type);
        let mut remaining = data;

        let layers = StackLevel::ALL.map(|level| {
            let (layer, rest) = self.classify_level(number, level, remaining, &mut context);
            remaining = rest;
            layer
        });

        PacketRecord::new(number, time, data.len(), layers)
    }

    fn classify_level<'a>(
        &mut self,
        number: u64,
        level: StackLevel,
        data: &'a [u8],
        context: &mut ParseContext,
    ) -> (LayerValue, &'a [u8]) {
        let Some(parser) = self.registry.find_parser(level, data, context).copied() else {
            if !data.is_empty() {
                if let Some(identifier) = identify(level, context) {
                    debug!(frame = number, %level, %identifier, "unsupported protocol");
                    self.diagnostics.unsupported.push(DiagnosticEntry {
                        frame: number,
                        level,
                        message: format!("unsupported protocol ({identifier})"),
                        payload: Some(hex_preview(data)),
                    });
                }
            }
            return raw_layer(level, data, context);
        };

        let result = match parser.parse(data, context) {
            Ok(result) => result,
            Err(e) => {
                warn!(frame = number, %level, protocol = parser.name(), error = %e, "parse error");
                self.diagnostics.errors.push(DiagnosticEntry {
                    frame: number,
                    level,
                    message: format!("{} parse error: {e}", parser.display_name()),
                    payload: Some(hex_dump(data)),
                });
                return raw_layer(level, data, context);
            }
        };

        if let Some(e) = &result.error {
            warn!(frame = number, %level, protocol = parser.name(), error = %e, "partial parse");
            self.diagnostics.errors.push(DiagnosticEntry {
                frame: number,
                level,
                message: format!("{} parse error: {e}", parser.display_name()),
                payload: Some(hex_dump(data)),
            });
        }

        context.descend(parser.name(), &result);
        let remaining = result.remaining;
        let layer = LayerValue::new(level, result.data, result.size_total, remaining.len());

        if layer.data().checksum_valid() == Some(false) {
            warn!(frame = number, %level, protocol = parser.name(), "checksum mismatch");
            self.diagnostics.checksum.push(DiagnosticEntry {
                frame: number,
                level,
                message: format!("{} checksum mismatch", parser.display_name()),
                payload: None,
            });
        }

        debug!(frame = number, %level, protocol = layer.protocol_name(), "classified");
        (layer, remaining)
    }
}

/// Raw layer over the rest of the frame.
fn raw_layer<'a>(
    level: StackLevel,
    data: &'a [u8],
    context: &mut ParseContext,
) -> (LayerValue, &'a [u8]) {
    context.descend_raw(data.len());
    (LayerValue::raw(level, data.len()), &[])
}

/// What the previous level announced for this one, if anything.
///
/// Only identified payloads count as unsupported; the rest are silently Raw.
fn identify(level: StackLevel, context: &ParseContext) -> Option<String> {
    match level {
        StackLevel::Link => Some(format!("link type {}", context.link_type)),
        StackLevel::Network => context
            .hint("ethertype")
            .map(|value| format!("ethertype {}", ethertype::display(value as u16))),
        StackLevel::Transport => context
            .hint("ip_protocol")
            .map(|value| format!("ip protocol {value}")),
        StackLevel::Application => None,
    }
}

/// First bytes of a payload as hex.
fn hex_preview(data: &[u8]) -> String {
    let shown = &data[..data.len().min(PREVIEW_LEN)];
    let mut out = hex_bytes(shown);
    if data.len() > PREVIEW_LEN {
        out.push_str(&format!(" ... ({} bytes)", data.len()));
    }
    out
}

/// Offset-prefixed hex dump, 16 bytes per line.
fn hex_dump(data: &[u8]) -> String {
    data.chunks(16)
        .enumerate()
        .map(|(i, chunk)| format!("{:04x}  {}", i * 16, hex_bytes(chunk)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn hex_bytes(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}
