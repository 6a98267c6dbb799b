//! Decoded packet data model.
//!
//! A [`PacketRecord`] holds exactly one [`LayerValue`] per [`StackLevel`].
//! Each layer carries a protocol-specific [`LayerData`] variant; levels whose
//! decoder failed or whose protocol is not modeled hold [`LayerData::Raw`].

mod layer;
mod packet;

pub use layer::{LayerData, LayerFields, LayerValue, StackLevel};
pub use packet::PacketRecord;
