//! The external audio-graph boundary and its fixed presets.
//!
//! This module defines:
//! - The collaborator traits the controller drives (`AudioGraph`,
//!   `LoopPlayer`, `PolyVoice`) and the node-parameter structs it hands
//!   them
//! - The production presets (timbre, reverb, filter chains)
//!
//! No signal processing happens here; implementations of `AudioGraph` own
//! all node construction and wiring.

pub mod graph;
pub mod presets;

#[cfg(test)]
pub(crate) mod mock;

pub use graph::{AudioGraph, LoopPlayer, OnPlayerLoad, Pitch, PolyVoice};
