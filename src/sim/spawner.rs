//! Letter token spawning
//!
//! Always spawns the slot at the head of the work queue and removes it from
//! the queue right away; a missed token puts its slot back at the tail.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{EntityStore, GameEvent, GamePhase, GameState, LetterToken};
use crate::consts::*;
use crate::ms_to_ticks;
use crate::tuning::Tuning;

/// When a new token may enter play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpawnPolicy {
    /// Every spawn interval, regardless of what is already falling
    #[default]
    Interval,
    /// Every spawn interval, but only once nothing uncollected is falling
    Serialized,
}

impl SpawnPolicy {
    /// Whether the policy allows a spawn right now
    pub fn allows(&self, store: &EntityStore, ticks_since_spawn: u32, interval_ticks: u32) -> bool {
        if ticks_since_spawn < interval_ticks {
            return false;
        }
        match self {
            SpawnPolicy::Interval => true,
            SpawnPolicy::Serialized => store.uncollected_tokens().next().is_none(),
        }
    }
}

/// Uniform draw between two bounds given in either order
///
/// A non-finite bound collapses the span onto the other one (or zero).
fn draw<R: Rng + ?Sized>(rng: &mut R, a: f32, b: f32) -> f32 {
    match (a.is_finite(), b.is_finite()) {
        (true, true) => rng.random_range(a.min(b)..=a.max(b)),
        (true, false) => a,
        (false, true) => b,
        (false, false) => 0.0,
    }
}

/// Build a token for `slot` just above the top edge
///
/// Horizontal position and sway are drawn from `rng`; pass a seeded RNG to
/// reproduce exact trajectories.
pub fn make_token<R: Rng + ?Sized>(
    id: u32,
    slot: usize,
    letter: char,
    tuning: &Tuning,
    rng: &mut R,
) -> LetterToken {
    LetterToken {
        id,
        pos: Vec2::new(
            rng.random_range(SPAWN_MARGIN..=100.0 - SPAWN_MARGIN),
            TOKEN_SPAWN_Y,
        ),
        slot,
        letter,
        fall_speed: draw(rng, tuning.fall_speed_min, tuning.fall_speed_max),
        sway_phase: rng.random_range(0.0..TAU),
        sway_speed: draw(rng, tuning.sway_speed_min, tuning.sway_speed_max),
        collected: false,
    }
}

/// Advance the spawn timer and spawn the queue head if the policy allows
///
/// Returns the id of the spawned token, if any. Never spawns once the
/// session is complete or the queue is empty.
pub fn update(state: &mut GameState) -> Option<u32> {
    state.ticks_since_spawn = state.ticks_since_spawn.saturating_add(1);

    if state.phase != GamePhase::Running || state.complete {
        return None;
    }
    let interval = ms_to_ticks(state.tuning.spawn_interval_ms);
    if !state
        .tuning
        .spawn_policy
        .allows(&state.store, state.ticks_since_spawn, interval)
    {
        return None;
    }

    let slot = state.queue.head()?;
    let letter = state.phrase.letter_at(slot)?;
    state.queue.pop_head();
    let id = state.store.next_entity_id();
    let token = make_token(id, slot, letter, &state.tuning, &mut state.rng);
    log::debug!("Spawn '{}' (slot {}) at x={:.1}", letter, slot, token.pos.x);

    state.store.insert_token(token);
    state.ticks_since_spawn = 0;
    state.emit(GameEvent::TokenSpawned { token: id, slot });
    Some(id)
}
