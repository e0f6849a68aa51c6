//! The playback controller.
//!
//! Owns the rhythm catalog, one optional looping player per catalog
//! position, the shared playback rate, and the two lazily built melodic
//! voices (harp and pad). All operations run on the single control thread;
//! the only asynchrony is sample-load completion, delivered through
//! callbacks that resolve shared slot cells and a counted load batch.

use crate::audio::graph::{AudioGraph, LoopPlayer, Pitch, PolyVoice};
use crate::audio::presets;
use crate::catalog::RhythmCatalog;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by the controller. Everything else is a silent no-op
/// by design (e.g. toggling an empty rhythm slot).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControllerError {
    /// A pad release was issued before any pad attack built the voice.
    #[error("pad voice has not been built; call trigger_pad_attack first")]
    PadNotBuilt,
}

/// Direction of a tempo command. Anything that is not "up" is down,
/// matching the original string contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempoDirection {
    Up,
    Down,
}

impl From<&str> for TempoDirection {
    fn from(value: &str) -> Self {
        if value == "up" {
            TempoDirection::Up
        } else {
            TempoDirection::Down
        }
    }
}

/// One catalog position's player.
///
/// `Vacant` covers both a resource-less catalog entry and a failed load;
/// `Pending` is a request still in flight. Only `Ready` slots can play.
enum SlotState<P> {
    Vacant,
    Pending,
    Ready(P),
}

/// Slot cells are shared with the load callback that eventually fills
/// them in.
type SharedSlot<P> = Arc<Mutex<SlotState<P>>>;

/// Counted completion for one initialization's sample loads.
///
/// Every catalog entry accounts for exactly one completion: resource-less
/// entries complete immediately, loads complete from their callback
/// whether they succeeded or failed. Each `initialize` call allocates a
/// fresh batch, so callbacks from a superseded initialization decrement
/// their own stale batch and never touch the current one.
struct LoadBatch {
    pending: AtomicUsize,
    loaded: AtomicBool,
}

impl LoadBatch {
    /// A batch that has nothing to load and never reports loaded; used
    /// before the first `initialize`.
    fn idle() -> Arc<Self> {
        Arc::new(Self {
            pending: AtomicUsize::new(0),
            loaded: AtomicBool::new(false),
        })
    }

    fn new(total: usize) -> Arc<Self> {
        Arc::new(Self {
            pending: AtomicUsize::new(total),
            loaded: AtomicBool::new(total == 0),
        })
    }

    fn complete_one(&self) {
        if self.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.loaded.store(true, Ordering::Release);
        }
    }

    fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }
}

/// The shared playback rate, stored as `f64` bits so in-flight load
/// callbacks can read the value current at resolution time rather than
/// the one captured when the load was requested.
struct SharedRate(AtomicU64);

impl SharedRate {
    fn new(rate: f64) -> Arc<Self> {
        Arc::new(Self(AtomicU64::new(rate.to_bits())))
    }

    fn set(&self, rate: f64) {
        self.0.store(rate.to_bits(), Ordering::Release);
    }

    fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Acquire))
    }
}

/// A melodic voice: built at most once, on first use, and never torn down.
enum LazyVoice<V> {
    Uninitialized,
    Built(V),
}

impl<V> LazyVoice<V> {
    fn get_or_build(&mut self, build: impl FnOnce() -> V) -> &mut V {
        if matches!(self, LazyVoice::Uninitialized) {
            *self = LazyVoice::Built(build());
        }
        match self {
            LazyVoice::Built(voice) => voice,
            LazyVoice::Uninitialized => unreachable!("voice was just built"),
        }
    }

    fn built_mut(&mut self) -> Option<&mut V> {
        match self {
            LazyVoice::Built(voice) => Some(voice),
            LazyVoice::Uninitialized => None,
        }
    }
}

/// Drives backing-track playback and the two accompaniment voices.
///
/// The controller orchestrates an external [`AudioGraph`]; it never
/// processes audio itself. All state lives in this struct, with no
/// process-wide globals.
pub struct PlaybackController<G: AudioGraph> {
    graph: G,
    catalog: RhythmCatalog,
    slots: Vec<SharedSlot<G::Player>>,
    batch: Arc<LoadBatch>,
    selected: usize,
    rhythm_on: bool,
    rate: Arc<SharedRate>,
    harp: LazyVoice<G::Voice>,
    pad: LazyVoice<G::Voice>,
}

impl<G: AudioGraph> PlaybackController<G> {
    /// Creates a controller over the production six-rhythm catalog.
    ///
    /// The controller is inert until [`initialize`](Self::initialize) is
    /// called.
    pub fn new(graph: G) -> Self {
        Self::with_catalog(graph, RhythmCatalog::default())
    }

    /// Creates a controller over a custom catalog.
    ///
    /// # Panics
    ///
    /// Panics if the catalog is empty; selection needs at least one
    /// position.
    pub fn with_catalog(graph: G, catalog: RhythmCatalog) -> Self {
        assert!(
            !catalog.is_empty(),
            "rhythm catalog must have at least one entry"
        );
        Self {
            graph,
            catalog,
            slots: Vec::new(),
            batch: LoadBatch::idle(),
            selected: 0,
            rhythm_on: false,
            rate: SharedRate::new(1.0),
            harp: LazyVoice::Uninitialized,
            pad: LazyVoice::Uninitialized,
        }
    }

    /// Builds the shared rhythm path and kicks off sample loading.
    ///
    /// Selection starts at `rhythm` (falling back to the first catalog
    /// position for an unknown name) and every requested player is preset
    /// to `rate`. Playback starts off; `is_loaded` flips to true once
    /// every catalog entry has loaded, failed, or been skipped.
    ///
    /// Calling this again fully resets rhythm state and discards prior
    /// slots. The harp and pad voices persist across re-initialization.
    pub fn initialize(&mut self, rhythm: &str, rate: f64) {
        self.selected = self.catalog.position(rhythm).unwrap_or(0);
        self.rate.set(rate);
        self.rhythm_on = false;
        tracing::info!(rhythm, rate, "initializing backing rig");

        self.graph.build_rhythm_bus(&presets::RHYTHM_BUS);

        let batch = LoadBatch::new(self.catalog.len());
        self.batch = Arc::clone(&batch);
        self.slots.clear();

        for entry in self.catalog.iter() {
            let Some(resource) = &entry.resource else {
                self.slots.push(Arc::new(Mutex::new(SlotState::Vacant)));
                batch.complete_one();
                continue;
            };

            let slot: SharedSlot<G::Player> = Arc::new(Mutex::new(SlotState::Pending));
            self.slots.push(Arc::clone(&slot));

            let cb_batch = Arc::clone(&batch);
            let cb_rate = Arc::clone(&self.rate);
            let cb_resource = resource.clone();
            self.graph.request_loop_player(
                resource,
                rate,
                Box::new(move |result| {
                    let state = match result {
                        Ok(mut player) => {
                            // Tempo commands issued while this load was in
                            // flight could not reach the player; catch it up
                            // so every ready slot agrees with the shared rate.
                            let current = cb_rate.get();
                            if player.playback_rate() != current {
                                player.set_playback_rate(current);
                            }
                            SlotState::Ready(player)
                        }
                        Err(error) => {
                            tracing::warn!(
                                resource = %cb_resource,
                                %error,
                                "sample load failed; slot stays empty"
                            );
                            SlotState::Vacant
                        }
                    };
                    if let Ok(mut cell) = slot.lock() {
                        *cell = state;
                    }
                    cb_batch.complete_one();
                }),
            );
        }
    }

    /// Moves selection one position forward, wrapping at the end.
    /// Returns the newly selected rhythm name.
    pub fn advance(&mut self) -> &str {
        self.stop_selected_if_playing();
        self.selected = self.catalog.next_index(self.selected);
        self.restart_after_move();
        tracing::debug!(rhythm = self.catalog.name(self.selected), "rhythm selected");
        self.catalog.name(self.selected)
    }

    /// Moves selection one position backward, wrapping below zero.
    /// Returns the newly selected rhythm name.
    pub fn retreat(&mut self) -> &str {
        self.stop_selected_if_playing();
        self.selected = self.catalog.prev_index(self.selected);
        self.restart_after_move();
        tracing::debug!(rhythm = self.catalog.name(self.selected), "rhythm selected");
        self.catalog.name(self.selected)
    }

    /// Toggles playback of the selected rhythm. No-op while the selected
    /// slot has no ready player.
    pub fn trigger_rhythm(&mut self) {
        let Some(slot) = self.slots.get(self.selected) else {
            return;
        };
        let Ok(mut state) = slot.lock() else { return };
        let SlotState::Ready(player) = &mut *state else {
            return;
        };
        if self.rhythm_on {
            player.stop();
        } else {
            player.start();
        }
        self.rhythm_on = !self.rhythm_on;
    }

    /// Scales the shared playback rate up or down and applies it to every
    /// ready slot. Returns the new rate.
    pub fn tempo(&mut self, direction: TempoDirection) -> f64 {
        let factor = match direction {
            TempoDirection::Up => presets::TEMPO_UP_FACTOR,
            TempoDirection::Down => presets::TEMPO_DOWN_FACTOR,
        };
        let rate = self.rate.get() * factor;
        self.rate.set(rate);
        for slot in &self.slots {
            if let Ok(mut state) = slot.lock() {
                if let SlotState::Ready(player) = &mut *state {
                    player.set_playback_rate(rate);
                }
            }
        }
        tracing::debug!(rate, "tempo changed");
        rate
    }

    /// Plucks the given note or chord on the harp voice, building the
    /// voice on first use. Polyphonic; overlapping calls are fine.
    pub fn trigger_harp(&mut self, notes: &[Pitch]) {
        let graph = &mut self.graph;
        let voice = self
            .harp
            .get_or_build(|| graph.build_voice(&presets::HARP_CHAIN));
        voice.attack_release(notes, presets::HARP_NOTE_SECONDS);
    }

    /// Begins sustaining a pad chord, building the voice on first use.
    /// The chord sounds until released.
    pub fn trigger_pad_attack(&mut self, chord: &[Pitch]) {
        let graph = &mut self.graph;
        let voice = self
            .pad
            .get_or_build(|| graph.build_voice(&presets::PAD_CHAIN));
        voice.attack(chord);
    }

    /// Ends the sustain for a pad chord previously passed to
    /// [`trigger_pad_attack`](Self::trigger_pad_attack).
    ///
    /// Callers own attack/release pairing; releasing before any attack is
    /// a precondition violation and returns [`ControllerError::PadNotBuilt`].
    pub fn trigger_pad_release(&mut self, chord: &[Pitch]) -> Result<(), ControllerError> {
        match self.pad.built_mut() {
            Some(voice) => {
                voice.release(chord);
                Ok(())
            }
            None => Err(ControllerError::PadNotBuilt),
        }
    }

    /// Releases every sounding pad note. Does not touch the harp or
    /// rhythm playback; no-op if the pad voice was never built.
    pub fn stop_all(&mut self) {
        if let Some(voice) = self.pad.built_mut() {
            voice.release_all();
        }
    }

    /// The currently selected catalog position.
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// The currently selected rhythm name.
    pub fn selected_rhythm(&self) -> &str {
        self.catalog.name(self.selected)
    }

    /// Whether the selected rhythm is currently sounding.
    pub fn is_playing(&self) -> bool {
        self.rhythm_on
    }

    /// Whether every catalog entry from the latest `initialize` has
    /// loaded, failed, or been skipped.
    pub fn is_loaded(&self) -> bool {
        self.batch.is_loaded()
    }

    /// The shared playback rate applied to all rhythm players.
    pub fn playback_rate(&self) -> f64 {
        self.rate.get()
    }

    /// The rhythm catalog this controller selects from.
    pub fn catalog(&self) -> &RhythmCatalog {
        &self.catalog
    }

    /// The underlying audio graph.
    pub fn graph(&self) -> &G {
        &self.graph
    }

    /// Mutable access to the underlying audio graph.
    pub fn graph_mut(&mut self) -> &mut G {
        &mut self.graph
    }

    /// Stops the selected slot's player if something is sounding there.
    /// Called before moving selection; the stop must observe the old
    /// index.
    fn stop_selected_if_playing(&mut self) {
        if !self.rhythm_on {
            return;
        }
        if let Some(slot) = self.slots.get(self.selected) {
            if let Ok(mut state) = slot.lock() {
                if let SlotState::Ready(player) = &mut *state {
                    player.stop();
                }
            }
        }
    }

    /// After selection moved: keep playing if the new slot can play,
    /// otherwise drop the playing flag: there is nothing to play.
    fn restart_after_move(&mut self) {
        if !self.rhythm_on {
            return;
        }
        let started = self.slots.get(self.selected).is_some_and(|slot| {
            if let Ok(mut state) = slot.lock() {
                if let SlotState::Ready(player) = &mut *state {
                    player.start();
                    return true;
                }
            }
            false
        });
        if !started {
            self.rhythm_on = false;
        }
    }
}
