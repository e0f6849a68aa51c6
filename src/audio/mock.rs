//! A recording audio graph for tests.
//!
//! Load completions are queued rather than delivered inline, so tests can
//! resolve or fail individual sample loads at any point and observe how
//! the controller reacts.

use super::graph::{
    AudioGraph, LoopPlayer, OnPlayerLoad, Pitch, PolyVoice, RhythmBusSpec, VoiceChainSpec,
};
use std::sync::{Arc, Mutex};

pub(crate) type EventLog = Arc<Mutex<Vec<GraphEvent>>>;

/// Everything the mock graph and its nodes observed, in call order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum GraphEvent {
    BusBuilt,
    PlayerRequested(String),
    PlayerStarted(String),
    PlayerStopped(String),
    RateSet(String, f64),
    VoiceBuilt { id: usize, with_echo: bool },
    Attack(usize, Vec<Pitch>),
    Release(usize, Vec<Pitch>),
    AttackRelease(usize, Vec<Pitch>, f64),
    ReleaseAll(usize),
}

struct PendingLoad {
    resource: String,
    rate: f64,
    on_load: OnPlayerLoad<MockPlayer>,
}

#[derive(Default)]
pub(crate) struct MockGraph {
    log: EventLog,
    pending: Vec<PendingLoad>,
    voices_built: usize,
}

impl MockGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every recorded event so far.
    pub fn events(&self) -> Vec<GraphEvent> {
        self.log.lock().unwrap().clone()
    }

    /// Number of load requests not yet resolved or failed.
    pub fn pending_loads(&self) -> usize {
        self.pending.len()
    }

    /// Resolves the pending load at `index` with a working player.
    pub fn resolve(&mut self, index: usize) {
        let load = self.pending.remove(index);
        let player = MockPlayer {
            resource: load.resource,
            rate: load.rate,
            log: Arc::clone(&self.log),
        };
        (load.on_load)(Ok(player));
    }

    /// Fails the pending load at `index`.
    pub fn fail(&mut self, index: usize) {
        let load = self.pending.remove(index);
        (load.on_load)(Err(anyhow::anyhow!("sample fetch failed: {}", load.resource)));
    }

    /// Resolves every pending load, oldest first.
    pub fn resolve_all(&mut self) {
        while !self.pending.is_empty() {
            self.resolve(0);
        }
    }

    fn record(&self, event: GraphEvent) {
        self.log.lock().unwrap().push(event);
    }
}

impl AudioGraph for MockGraph {
    type Player = MockPlayer;
    type Voice = MockVoice;

    fn build_rhythm_bus(&mut self, _spec: &RhythmBusSpec) {
        self.record(GraphEvent::BusBuilt);
    }

    fn request_loop_player(
        &mut self,
        resource: &str,
        rate: f64,
        on_load: OnPlayerLoad<Self::Player>,
    ) {
        self.record(GraphEvent::PlayerRequested(resource.to_string()));
        self.pending.push(PendingLoad {
            resource: resource.to_string(),
            rate,
            on_load,
        });
    }

    fn build_voice(&mut self, spec: &VoiceChainSpec) -> Self::Voice {
        let id = self.voices_built;
        self.voices_built += 1;
        self.record(GraphEvent::VoiceBuilt {
            id,
            with_echo: spec.echo.is_some(),
        });
        MockVoice {
            id,
            log: Arc::clone(&self.log),
        }
    }
}

pub(crate) struct MockPlayer {
    resource: String,
    rate: f64,
    log: EventLog,
}

impl LoopPlayer for MockPlayer {
    fn start(&mut self) {
        self.log
            .lock()
            .unwrap()
            .push(GraphEvent::PlayerStarted(self.resource.clone()));
    }

    fn stop(&mut self) {
        self.log
            .lock()
            .unwrap()
            .push(GraphEvent::PlayerStopped(self.resource.clone()));
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.rate = rate;
        self.log
            .lock()
            .unwrap()
            .push(GraphEvent::RateSet(self.resource.clone(), rate));
    }

    fn playback_rate(&self) -> f64 {
        self.rate
    }
}

pub(crate) struct MockVoice {
    id: usize,
    log: EventLog,
}

impl PolyVoice for MockVoice {
    fn attack(&mut self, chord: &[Pitch]) {
        self.log
            .lock()
            .unwrap()
            .push(GraphEvent::Attack(self.id, chord.to_vec()));
    }

    fn release(&mut self, chord: &[Pitch]) {
        self.log
            .lock()
            .unwrap()
            .push(GraphEvent::Release(self.id, chord.to_vec()));
    }

    fn attack_release(&mut self, chord: &[Pitch], duration_seconds: f64) {
        self.log.lock().unwrap().push(GraphEvent::AttackRelease(
            self.id,
            chord.to_vec(),
            duration_seconds,
        ));
    }

    fn release_all(&mut self) {
        self.log.lock().unwrap().push(GraphEvent::ReleaseAll(self.id));
    }
}
