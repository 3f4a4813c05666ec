//! Idle/demo mode - the character plays the greeting by itself
//!
//! Produces the same intents a player would, so the simulation cannot tell
//! the difference.

use super::state::{GamePhase, GameState, LetterToken};
use super::tick::TickInput;
use crate::consts::*;

/// Closer than this and the autopilot stops walking
const ARRIVE_DISTANCE: f32 = 1.0;
/// Fraction of the hit radius the character must be within before firing
const AIM_FRACTION: f32 = 0.4;

/// The lowest token that a projectile can still reach
fn pick_target(state: &GameState) -> Option<&LetterToken> {
    state
        .store
        .uncollected_tokens()
        .filter(|t| t.pos.y >= 0.0 && t.pos.y < PROJECTILE_START_Y)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y).then(b.id.cmp(&a.id)))
}

/// Overwrite `input` with movement and fire intents toward the best target
pub fn steer(state: &GameState, input: &mut TickInput) {
    if state.phase != GamePhase::Running {
        return;
    }
    let Some(target) = pick_target(state) else {
        return;
    };

    let dx = target.pos.x - state.player.x;
    input.steps = 0;
    input.hold_left = dx < -ARRIVE_DISTANCE;
    input.hold_right = dx > ARRIVE_DISTANCE;

    let aimed = dx.abs() < state.tuning.hit_radius * AIM_FRACTION;
    // Never spam, even when the cooldown is disabled
    let in_flight = state.store.active_projectiles().next().is_some();
    input.fire = aimed && !in_flight && state.can_fire();
}
