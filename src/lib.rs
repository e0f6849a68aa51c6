//! backline - backing-track playback and accompaniment voices.
//!
//! This library drives the rhythm section of an interactive accompaniment
//! tool: a fixed catalog of looping backing tracks with circular
//! selection, a shared tempo scale, and two lazily built melodic voices
//! (a plucked harp and a sustained pad). All signal processing is
//! delegated to an external audio-graph library behind the
//! [`AudioGraph`] trait.

pub mod audio;
pub mod catalog;
pub mod controller;

// Re-export commonly used types
pub use audio::graph::{AudioGraph, LoopPlayer, Pitch, PolyVoice};
pub use catalog::{RhythmCatalog, RhythmEntry};
pub use controller::{ControllerError, PlaybackController, TempoDirection};
