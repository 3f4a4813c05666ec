//! Fixed timestep simulation tick
//!
//! Per-tick order: movement, phase gate, fire, spawn, motion, culling,
//! collisions, progress.

use glam::Vec2;

use super::state::{EntityId, GameEvent, GamePhase, GameState, Projectile};
use super::{autopilot, collision, kinematics, progress, spawner};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Net discrete left/right taps (negative = left)
    pub steps: i32,
    /// Direction keys currently held
    pub hold_left: bool,
    pub hold_right: bool,
    /// Fire a projectile
    pub fire: bool,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
}

/// Advance the session by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    // Overlay suspends everything until replay
    if state.phase == GamePhase::Overlay {
        return;
    }

    let mut input = input.clone();
    if input.idle_mode {
        autopilot::steer(state, &mut input);
    }
    let input = &input;

    state.time_ticks += 1;

    apply_movement(state, input);
    kinematics::smooth_player(state);

    if state.phase == GamePhase::Idle {
        state.entrance_ticks = state.entrance_ticks.saturating_sub(1);
        if state.entrance_ticks > 0 {
            return;
        }
        state.set_phase(GamePhase::Running);
        state.emit(GameEvent::Started);
        // A phrase with nothing to collect is already done
        if progress::check_completion(state) {
            return;
        }
    }

    if state.phase == GamePhase::Complete {
        progress::update_overlay_countdown(state);
        if state.phase == GamePhase::Overlay {
            return;
        }
    }

    if input.fire {
        fire(state);
    }

    spawner::update(state);
    kinematics::advance(state);
    kinematics::cull(state);

    let hits = collision::resolve(&mut state.store, state.tuning.hit_radius);
    for hit in &hits {
        progress::record(state, hit);
    }
}

/// Launch a projectile from the character, respecting the cooldown
pub fn fire(state: &mut GameState) -> Option<EntityId> {
    if !state.can_fire() {
        log::debug!("Fire ignored in {:?}", state.phase);
        return None;
    }

    let id = state.store.next_entity_id();
    state.store.insert_projectile(Projectile {
        id,
        pos: Vec2::new(state.player.x, PROJECTILE_START_Y),
        active: true,
    });
    state.emit(GameEvent::ProjectileFired { projectile: id });
    Some(id)
}

fn apply_movement(state: &mut GameState, input: &TickInput) {
    let mut delta = input.steps as f32 * state.tuning.step_distance;
    if input.hold_left {
        delta -= state.tuning.held_speed;
    }
    if input.hold_right {
        delta += state.tuning.held_speed;
    }
    if delta != 0.0 {
        state.player.nudge(delta);
    }
}
