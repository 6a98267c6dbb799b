//! Packet records: one classified frame.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{LayerValue, StackLevel};

/// The four-level decoded representation of one captured frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketRecord {
    /// Primary key across all loaded captures.
    pub uid: Uuid,
    /// Position of the frame in its capture, starting at 1.
    pub number: u64,
    /// Capture timestamp.
    pub time: DateTime<Utc>,
    /// Frame length in bytes.
    pub size: usize,
    layers: [LayerValue; 4],
}

impl PacketRecord {
    /// Assemble a record. `layers` must be in [`StackLevel::ALL`] order.
    pub fn new(number: u64, time: DateTime<Utc>, size: usize, layers: [LayerValue; 4]) -> Self {
        debug_assert!(layers
            .iter()
            .zip(StackLevel::ALL)
            .all(|(layer, level)| layer.level() == level));
        Self {
            uid: Uuid::new_v4(),
            number,
            time,
            size,
            layers,
        }
    }

    /// The layer classified at `level`.
    pub fn layer(&self, level: StackLevel) -> &LayerValue {
        &self.layers[level.index()]
    }

    /// Layers, outermost first.
    pub fn layers(&self) -> &[LayerValue; 4] {
        &self.layers
    }
}

impl fmt::Display for PacketRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Packet #{} ({}) at {} [{} bytes]",
            self.number,
            self.uid,
            self.time.format("%Y-%m-%d %H:%M:%S%.6f"),
            self.size
        )?;
        for layer in &self.layers {
            write!(f, "  {layer}")?;
        }
        Ok(())
    }
}
