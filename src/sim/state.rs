//! Session state and core simulation types
//!
//! Everything one playthrough owns lives in [`GameState`]; replay throws the
//! whole value away and builds a fresh one.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::Tuning;
use crate::{clamp_lateral, ms_to_ticks};

/// Stable entity identifier (never reused within a session)
pub type EntityId = u32;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Entrance delay before play starts
    Idle,
    /// Active gameplay
    Running,
    /// Every letter collected; waiting for the overlay delay
    Complete,
    /// Greeting overlay shown, ticking suspended until replay
    Overlay,
}

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Entrance delay finished
    Started,
    /// A token entered play
    TokenSpawned { token: EntityId, slot: usize },
    /// A token left the bottom edge uncollected; its slot went back on the queue
    TokenMissed { token: EntityId, slot: usize },
    /// A projectile was fired
    ProjectileFired { projectile: EntityId },
    /// A projectile left the top edge without hitting anything
    ProjectileExpired { projectile: EntityId },
    /// A projectile hit a token
    LetterCollected {
        slot: usize,
        letter: char,
        token: EntityId,
        projectile: EntityId,
    },
    /// The progress set filled up (emitted once per session)
    Completed,
    /// Overlay delay elapsed
    OverlayShown,
}

/// A falling letter star
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetterToken {
    pub id: EntityId,
    /// x in 0..100, y in 0..100 (negative above the visible area)
    pub pos: Vec2,
    /// Index into the phrase this token stands for
    pub slot: usize,
    pub letter: char,
    /// Vertical travel per tick
    pub fall_speed: f32,
    /// Sway phase offset (radians)
    pub sway_phase: f32,
    /// Sway angular speed (radians/second)
    pub sway_speed: f32,
    pub collected: bool,
}

/// A heart fired upward by the character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: EntityId,
    pub pos: Vec2,
    pub active: bool,
}

/// Live entities, keyed by id so iteration order is stable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityStore {
    pub tokens: BTreeMap<EntityId, LetterToken>,
    pub projectiles: BTreeMap<EntityId, Projectile>,
    next_id: EntityId,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            tokens: BTreeMap::new(),
            projectiles: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn insert_token(&mut self, token: LetterToken) {
        self.tokens.insert(token.id, token);
    }

    pub fn insert_projectile(&mut self, projectile: Projectile) {
        self.projectiles.insert(projectile.id, projectile);
    }

    /// Tokens still falling and not yet hit
    pub fn uncollected_tokens(&self) -> impl Iterator<Item = &LetterToken> {
        self.tokens.values().filter(|t| !t.collected)
    }

    pub fn active_projectiles(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.values().filter(|p| p.active)
    }

    /// Number of uncollected tokens in flight for one phrase slot
    pub fn in_flight_for(&self, slot: usize) -> usize {
        self.uncollected_tokens().filter(|t| t.slot == slot).count()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.projectiles.is_empty()
    }
}

/// Ordered backlog of phrase slots still to be spawned
///
/// Holds phrase indices rather than characters so repeated letters are
/// tracked independently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkQueue {
    slots: VecDeque<usize>,
}

impl WorkQueue {
    /// Queue holding every required slot of the phrase, in phrase order
    pub fn full(phrase: &Phrase) -> Self {
        Self {
            slots: phrase.slots().iter().copied().collect(),
        }
    }

    pub fn head(&self) -> Option<usize> {
        self.slots.front().copied()
    }

    pub fn pop_head(&mut self) -> Option<usize> {
        self.slots.pop_front()
    }

    /// Return a missed slot to the back of the line
    pub fn push_tail(&mut self, slot: usize) {
        self.slots.push_back(slot);
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, slot: usize) -> bool {
        self.slots.contains(&slot)
    }

    /// How many times `slot` is queued (more than once is a bookkeeping bug)
    pub fn count(&self, slot: usize) -> usize {
        self.slots.iter().filter(|&&s| s == slot).count()
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.slots.iter().copied().collect()
    }
}

/// Phrase slots already collected. Only grows until reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSet {
    slots: BTreeSet<usize>,
}

impl ProgressSet {
    /// Returns false if the slot was already present
    pub fn insert(&mut self, slot: usize) -> bool {
        self.slots.insert(slot)
    }

    pub fn contains(&self, slot: usize) -> bool {
        self.slots.contains(&slot)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Collected slots in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots.iter().copied()
    }
}

/// The target phrase and which of its characters must be collected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
    chars: Vec<char>,
    slots: Vec<usize>,
}

impl Phrase {
    /// Every non-whitespace character is a required slot
    pub fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let slots = chars
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_whitespace())
            .map(|(i, _)| i)
            .collect();
        Self { chars, slots }
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    /// Phrase indices that must be collected, in phrase order
    pub fn slots(&self) -> &[usize] {
        &self.slots
    }

    /// Total required letter occurrences
    pub fn required(&self) -> usize {
        self.slots.len()
    }

    pub fn letter_at(&self, slot: usize) -> Option<char> {
        self.chars.get(slot).copied()
    }
}

/// The player character's horizontal position, smoothed toward a target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub x: f32,
    pub target_x: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            x: CHARACTER_START_X,
            target_x: CHARACTER_START_X,
        }
    }
}

impl Player {
    /// Shift the target position, clamped to the lateral bounds
    pub fn nudge(&mut self, delta: f32) {
        self.target_x = clamp_lateral(self.target_x + delta);
    }

    /// Exponential approach toward the target, snapping when close
    pub fn smooth(&mut self, blend: f32) {
        let diff = self.target_x - self.x;
        if diff.abs() < SNAP_EPSILON {
            self.x = self.target_x;
        } else {
            self.x = clamp_lateral(self.x + diff * blend);
        }
    }
}

/// RNG state wrapper
///
/// Each replay advances the stream so a new round gets fresh spawn
/// positions while staying reproducible from the run seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::new(self.seed, self.stream)
    }

    pub fn next_stream(&self) -> Self {
        Self {
            seed: self.seed,
            stream: self.stream.wrapping_add(1),
        }
    }
}

/// Complete state of one playthrough (deterministic)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub rng_state: RngState,
    /// Live RNG (rebuilt from `rng_state` on construction)
    #[serde(skip, default = "default_rng")]
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phrase: Phrase,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Entrance ticks remaining while Idle
    pub entrance_ticks: u32,
    /// Ticks since the last spawn
    pub ticks_since_spawn: u32,
    /// Ticks until the overlay is shown, once complete
    pub overlay_countdown: Option<u32>,
    /// One-shot completion flag
    pub complete: bool,
    pub player: Player,
    pub store: EntityStore,
    pub queue: WorkQueue,
    pub progress: ProgressSet,
    /// Events raised since the host last drained them
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

fn default_rng() -> Pcg32 {
    RngState::new(0).to_rng()
}

impl GameState {
    /// Create a new session state with the given tuning and seed
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self::with_rng_state(tuning, RngState::new(seed))
    }

    pub fn with_rng_state(tuning: Tuning, rng_state: RngState) -> Self {
        let phrase = Phrase::new(&tuning.phrase);
        let queue = WorkQueue::full(&phrase);
        let spawn_interval = ms_to_ticks(tuning.spawn_interval_ms);
        let entrance_ticks = ms_to_ticks(tuning.entrance_delay_ms);

        Self {
            rng_state,
            rng: rng_state.to_rng(),
            phrase,
            phase: GamePhase::Idle,
            time_ticks: 0,
            entrance_ticks,
            // First token drops as soon as play starts
            ticks_since_spawn: spawn_interval,
            overlay_countdown: None,
            complete: false,
            player: Player::default(),
            store: EntityStore::new(),
            queue,
            progress: ProgressSet::default(),
            events: Vec::new(),
            tuning,
        }
    }

    /// Fresh state for the next round (same tuning, next RNG stream)
    pub fn replayed(&self) -> Self {
        Self::with_rng_state(self.tuning.clone(), self.rng_state.next_stream())
    }

    pub fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::info!("Phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Whether a fire intent would currently produce a projectile
    pub fn can_fire(&self) -> bool {
        matches!(self.phase, GamePhase::Running | GamePhase::Complete)
            && !(self.tuning.single_projectile && self.store.active_projectiles().next().is_some())
    }

    /// Every required slot is exactly one of: queued, in flight, collected
    pub fn letters_conserved(&self) -> bool {
        self.phrase.slots().iter().all(|&slot| {
            let queued = self.queue.count(slot);
            let collected = usize::from(self.progress.contains(slot));
            queued + collected + self.store.in_flight_for(slot) == 1
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phrase_skips_whitespace() {
        let phrase = Phrase::new("HAPPY NEW YEAR");
        assert_eq!(phrase.required(), 12);
        assert_eq!(phrase.slots()[..6], [0, 1, 2, 3, 4, 6]);
        assert_eq!(phrase.letter_at(6), Some('N'));
        assert_eq!(phrase.text(), "HAPPY NEW YEAR");
    }

    #[test]
    fn test_work_queue_tracks_duplicate_letters_by_slot() {
        let phrase = Phrase::new("APPLE");
        let mut queue = WorkQueue::full(&phrase);
        assert_eq!(queue.to_vec(), vec![0, 1, 2, 3, 4]);

        assert_eq!(queue.pop_head(), Some(0));
        assert_eq!(queue.pop_head(), Some(1));
        queue.push_tail(1);
        // Both 'P' slots are still accounted for separately
        assert_eq!(queue.to_vec(), vec![2, 3, 4, 1]);
    }

    #[test]
    fn test_progress_set_insert_is_idempotent() {
        let mut progress = ProgressSet::default();
        assert!(progress.insert(3));
        assert!(!progress.insert(3));
        assert_eq!(progress.len(), 1);
    }

    #[test]
    fn test_player_smoothing_snaps() {
        let mut player = Player::default();
        player.nudge(10.0);
        for _ in 0..100 {
            player.smooth(0.35);
        }
        assert_eq!(player.x, CHARACTER_START_X + 10.0);
    }

    #[test]
    fn test_player_clamped_to_bounds() {
        let mut player = Player::default();
        player.nudge(-500.0);
        assert_eq!(player.target_x, LATERAL_MIN);
        player.nudge(1000.0);
        assert_eq!(player.target_x, LATERAL_MAX);
    }

    #[test]
    fn test_new_state_is_conserved() {
        let state = GameState::new(Tuning::default(), 7);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.queue.len(), state.phrase.required());
        assert!(state.letters_conserved());
    }

    #[test]
    fn test_replay_advances_rng_stream() {
        let state = GameState::new(Tuning::default(), 7);
        let next = state.replayed();
        assert_eq!(next.rng_state.seed, 7);
        assert_eq!(next.rng_state.stream, 1);
        assert_eq!(next.tuning, state.tuning);
    }

    #[test]
    fn test_duplicate_queue_entry_breaks_conservation() {
        let mut state = GameState::new(Tuning::default(), 7);
        state.queue.push_tail(0);
        assert_eq!(state.queue.count(0), 2);
        assert!(!state.letters_conserved());
    }
}
