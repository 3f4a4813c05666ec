//! Session controller - the host-facing side of the greeting
//!
//! Owns the simulation state outright. The host only queues intents and
//! hands over refresh timestamps; everything else happens inside a tick.

use std::collections::VecDeque;

use crate::clock::{FrameClock, StopHandle};
use crate::hooks::{AudioHooks, NullAudio};
use crate::input::{Direction, IntentBuffer};
use crate::sim::{GameEvent, GamePhase, GameState, tick};
use crate::snapshot::Snapshot;
use crate::tuning::{Tuning, TuningError};

/// Undrained events beyond this are dropped, oldest first
const MAX_PENDING_EVENTS: usize = 256;

pub struct Session<A: AudioHooks = NullAudio> {
    state: GameState,
    intents: IntentBuffer,
    clock: FrameClock,
    audio: A,
    stop: StopHandle,
    /// Survives replay: the ambient loop only starts once
    has_interacted: bool,
    idle_mode: bool,
    events: VecDeque<GameEvent>,
}

impl Session<NullAudio> {
    /// Session without audio
    pub fn silent(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        Self::new(tuning, seed, NullAudio)
    }
}

impl<A: AudioHooks> Session<A> {
    /// Start a session; the tuning is validated first
    pub fn new(tuning: Tuning, seed: u64, audio: A) -> Result<Self, TuningError> {
        let tuning = tuning.validated()?;
        log::info!("New session '{}' (seed {})", tuning.phrase, seed);
        Ok(Self {
            state: GameState::new(tuning, seed),
            intents: IntentBuffer::new(),
            clock: FrameClock::new(),
            audio,
            stop: StopHandle::new(),
            has_interacted: false,
            idle_mode: false,
            events: VecDeque::new(),
        })
    }

    fn interact(&mut self) {
        if !self.has_interacted {
            self.has_interacted = true;
            log::info!("First interaction");
            self.audio.on_first_interaction();
        }
    }

    pub fn move_left(&mut self) {
        self.interact();
        self.intents.move_left();
    }

    pub fn move_right(&mut self) {
        self.interact();
        self.intents.move_right();
    }

    /// A direction key went down
    pub fn press(&mut self, dir: Direction) {
        self.interact();
        self.intents.press(dir);
    }

    /// A direction key came up
    pub fn release(&mut self, dir: Direction) {
        self.intents.release(dir);
    }

    pub fn fire(&mut self) {
        self.interact();
        self.intents.fire();
    }

    /// Reset everything at the next tick boundary
    pub fn replay(&mut self) {
        self.interact();
        self.intents.request_replay();
    }

    /// Let the autopilot play
    pub fn set_idle_mode(&mut self, on: bool) {
        self.idle_mode = on;
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Stop ticking; later frames are ignored
    pub fn stop(&self) {
        log::info!("Session stopped");
        self.stop.stop();
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }

    /// Drive the session from a display refresh
    ///
    /// Returns false once the session has been stopped, telling the host
    /// not to schedule another refresh.
    pub fn frame(&mut self, timestamp_ms: f64) -> bool {
        if self.is_stopped() {
            return false;
        }
        let ticks = self.clock.advance(timestamp_ms);
        for _ in 0..ticks {
            self.step();
        }
        true
    }

    /// Run exactly one tick
    ///
    /// A pending replay consumes the tick: the state is rebuilt and nothing
    /// else happens until the next one.
    pub fn step(&mut self) {
        if self.intents.take_replay() {
            log::info!("Replay");
            self.state = self.state.replayed();
            self.intents.drain(false);
            return;
        }

        if self.state.phase == GamePhase::Overlay {
            // Only replay gets through while the greeting is up
            self.intents.drain(false);
            return;
        }

        let input = self.intents.drain(self.idle_mode);
        tick(&mut self.state, &input);

        for event in self.state.drain_events() {
            if let GameEvent::LetterCollected { .. } = event {
                self.audio.on_letter_collected();
            }
            self.buffer_event(event);
        }
    }

    fn buffer_event(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Events since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }
}
