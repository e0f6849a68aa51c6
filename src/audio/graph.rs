//! The boundary to the external audio-graph library.
//!
//! This crate orchestrates pre-built nodes; it does not implement synthesis,
//! filtering, or effects. The traits here are the seam: a production
//! implementation wires them to a real audio library, and tests drive a
//! recording mock.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A pitch in scientific notation (e.g. `"C4"`, `"F#3"`). Chords are
/// slices of pitches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pitch(String);

impl Pitch {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Pitch {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Filter node parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub kind: FilterKind,
    pub cutoff_hz: f32,
}

impl FilterSpec {
    pub const fn low_pass(cutoff_hz: f32) -> Self {
        Self {
            kind: FilterKind::LowPass,
            cutoff_hz,
        }
    }

    pub const fn high_pass(cutoff_hz: f32) -> Self {
        Self {
            kind: FilterKind::HighPass,
            cutoff_hz,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterKind {
    LowPass,
    HighPass,
}

/// Reverb node parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReverbSpec {
    /// Wet/dry mix (0.0 = dry, 1.0 = fully wet).
    pub wet: f32,
    /// Tail decay time in seconds.
    pub decay_seconds: f32,
    /// Delay before the reverb onset, in seconds.
    pub pre_delay_seconds: f32,
}

/// Stereo (ping-pong) echo parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EchoSpec {
    pub delay_seconds: f32,
    pub feedback: f32,
    pub wet: f32,
}

/// Oscillator waveform for a synthesizer voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
    /// Band-limited sawtooth with the given number of partials.
    Sawtooth { partials: u8 },
}

/// Shape of the attack segment of an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackCurve {
    Linear,
    Exponential,
}

/// ADSR envelope parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub attack_seconds: f32,
    pub attack_curve: AttackCurve,
    pub decay_seconds: f32,
    /// Sustain level (0.0–1.0).
    pub sustain: f32,
    pub release_seconds: f32,
}

/// A synthesizer timbre: oscillator shape plus envelope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimbrePreset {
    pub waveform: Waveform,
    pub envelope: Envelope,
}

/// The shared path all rhythm players feed: low-pass -> high-pass -> output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RhythmBusSpec {
    pub gain: f32,
    pub low_pass: FilterSpec,
    pub high_pass: FilterSpec,
}

/// A melodic voice chain: gain -> low-pass -> high-pass -> reverb
/// (-> echo, if present), terminating in a polyphonic synthesizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceChainSpec {
    pub gain: f32,
    pub low_pass: FilterSpec,
    pub high_pass: FilterSpec,
    pub reverb: ReverbSpec,
    pub echo: Option<EchoSpec>,
    pub timbre: TimbrePreset,
}

/// Completion callback for an asynchronous looping-player load.
///
/// Invoked exactly once, with the constructed player or the load failure.
pub type OnPlayerLoad<P> = Box<dyn FnOnce(Result<P, anyhow::Error>) + Send>;

/// A sample-backed looping player with adjustable playback rate.
pub trait LoopPlayer {
    fn start(&mut self);
    fn stop(&mut self);
    fn set_playback_rate(&mut self, rate: f64);
    fn playback_rate(&self) -> f64;
}

/// A polyphonic synthesizer voice.
pub trait PolyVoice {
    /// Begins sustaining the given chord until released.
    fn attack(&mut self, chord: &[Pitch]);

    /// Ends the sustain for the given chord.
    fn release(&mut self, chord: &[Pitch]);

    /// Triggers a complete attack-then-release of fixed duration.
    fn attack_release(&mut self, chord: &[Pitch], duration_seconds: f64);

    /// Releases every currently sounding note.
    fn release_all(&mut self);
}

/// The external audio-graph library.
///
/// Implementations own node construction and wiring; callers describe what
/// they need via the node-parameter structs above.
pub trait AudioGraph {
    type Player: LoopPlayer + Send + 'static;
    type Voice: PolyVoice;

    /// Builds the shared rhythm output path. Called once per
    /// initialization; players requested afterwards feed this path.
    fn build_rhythm_bus(&mut self, spec: &RhythmBusSpec);

    /// Asynchronously constructs a looping player bound to `resource`,
    /// wired into the rhythm bus, with its playback rate preset to `rate`.
    /// `on_load` fires once the sample is fetched and decoded (or fails).
    fn request_loop_player(&mut self, resource: &str, rate: f64, on_load: OnPlayerLoad<Self::Player>);

    /// Builds a melodic voice chain and returns its synthesizer handle.
    fn build_voice(&mut self, spec: &VoiceChainSpec) -> Self::Voice;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_display() {
        let pitch = Pitch::from("F#3");
        assert_eq!(pitch.as_str(), "F#3");
        assert_eq!(pitch.to_string(), "F#3");
    }

    #[test]
    fn test_filter_spec_constructors() {
        let lp = FilterSpec::low_pass(2400.0);
        assert_eq!(lp.kind, FilterKind::LowPass);
        assert_eq!(lp.cutoff_hz, 2400.0);

        let hp = FilterSpec::high_pass(100.0);
        assert_eq!(hp.kind, FilterKind::HighPass);
    }
}
