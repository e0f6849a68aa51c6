//! Fixed node parameters for the backing rig.
//!
//! These are the production settings: one shared timbre for both melodic
//! voices, one reverb, and the filter chains the controller requests from
//! the audio graph.

use super::graph::{
    AttackCurve, EchoSpec, Envelope, FilterSpec, ReverbSpec, RhythmBusSpec, TimbrePreset,
    VoiceChainSpec, Waveform,
};

/// Multiplier applied by a tempo-up command.
pub const TEMPO_UP_FACTOR: f64 = 1.05;

/// Multiplier applied by a tempo-down command.
pub const TEMPO_DOWN_FACTOR: f64 = 0.95;

/// Length of a plucked harp note, attack through release.
pub const HARP_NOTE_SECONDS: f64 = 0.3;

/// The timbre shared by the harp and pad voices.
pub const ACCOMPANIMENT_TIMBRE: TimbrePreset = TimbrePreset {
    waveform: Waveform::Sawtooth { partials: 16 },
    envelope: Envelope {
        attack_seconds: 0.1,
        attack_curve: AttackCurve::Exponential,
        decay_seconds: 0.3,
        sustain: 0.6,
        release_seconds: 1.0,
    },
};

/// Reverb shared by both melodic voice chains.
pub const VOICE_REVERB: ReverbSpec = ReverbSpec {
    wet: 0.5,
    decay_seconds: 1.4,
    pre_delay_seconds: 0.1,
};

/// The shared path every rhythm player feeds.
pub const RHYTHM_BUS: RhythmBusSpec = RhythmBusSpec {
    gain: 1.0,
    low_pass: FilterSpec::low_pass(2400.0),
    high_pass: FilterSpec::high_pass(100.0),
};

/// The harp chain: gain -> filters -> reverb -> stereo echo -> synth.
pub const HARP_CHAIN: VoiceChainSpec = VoiceChainSpec {
    gain: 0.2,
    low_pass: FilterSpec::low_pass(2000.0),
    high_pass: FilterSpec::high_pass(100.0),
    reverb: VOICE_REVERB,
    echo: Some(EchoSpec {
        delay_seconds: 0.25,
        feedback: 0.3,
        wet: 0.3,
    }),
    timbre: ACCOMPANIMENT_TIMBRE,
};

/// The pad chain: like the harp chain but with no echo stage.
pub const PAD_CHAIN: VoiceChainSpec = VoiceChainSpec {
    gain: 0.2,
    low_pass: FilterSpec::low_pass(2000.0),
    high_pass: FilterSpec::high_pass(100.0),
    reverb: VOICE_REVERB,
    echo: None,
    timbre: ACCOMPANIMENT_TIMBRE,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_chains_share_timbre() {
        assert_eq!(HARP_CHAIN.timbre, PAD_CHAIN.timbre);
        assert_eq!(HARP_CHAIN.reverb, PAD_CHAIN.reverb);
    }

    #[test]
    fn test_only_harp_has_echo() {
        assert!(HARP_CHAIN.echo.is_some());
        assert!(PAD_CHAIN.echo.is_none());
    }

    #[test]
    fn test_tempo_factors_bracket_unity() {
        assert!(TEMPO_UP_FACTOR > 1.0);
        assert!(TEMPO_DOWN_FACTOR < 1.0);
    }
}
