//! Per-tick motion and culling
//!
//! Speeds are per-tick deltas (the simulation runs on a fixed timestep), so
//! trajectories depend only on tick count and never on frame timing.

use super::state::{GameEvent, GameState};
use crate::clamp_lateral;
use crate::consts::*;

/// Horizontal sway offset for one tick
#[inline]
pub fn sway_offset(time_secs: f32, sway_speed: f32, sway_phase: f32, amplitude: f32) -> f32 {
    (time_secs * sway_speed + sway_phase).sin() * amplitude
}

/// Move every token down and every projectile up
pub fn advance(state: &mut GameState) {
    let time_secs = state.time_ticks as f32 * SIM_DT;
    let amplitude = state.tuning.sway_amplitude;
    let rise = state.tuning.projectile_speed;

    for token in state.store.tokens.values_mut() {
        token.pos.y += token.fall_speed;
        let sway = sway_offset(time_secs, token.sway_speed, token.sway_phase, amplitude);
        token.pos.x = clamp_lateral(token.pos.x + sway);
    }

    for projectile in state.store.projectiles.values_mut() {
        projectile.pos.y -= rise;
    }
}

/// Remove entities that left the playfield
///
/// An uncollected token that fell past the bottom returns its slot to the
/// tail of the work queue, so no letter is ever lost for good. A projectile
/// leaving the top frees the fire cooldown simply by no longer existing.
pub fn cull(state: &mut GameState) {
    let mut missed = Vec::new();
    state.store.tokens.retain(|_, token| {
        if token.pos.y > TOKEN_EXIT_Y {
            if !token.collected {
                missed.push((token.id, token.slot));
            }
            false
        } else {
            true
        }
    });

    for (token, slot) in missed {
        log::debug!("Token {} (slot {}) missed, re-queued", token, slot);
        state.queue.push_tail(slot);
        state.emit(GameEvent::TokenMissed { token, slot });
    }

    let mut expired = Vec::new();
    state.store.projectiles.retain(|_, projectile| {
        if projectile.pos.y < PROJECTILE_EXIT_Y {
            expired.push(projectile.id);
            false
        } else {
            true
        }
    });

    for projectile in expired {
        state.emit(GameEvent::ProjectileExpired { projectile });
    }
}

/// Ease the character toward its target position
pub fn smooth_player(state: &mut GameState) {
    let blend = state.tuning.smoothing;
    state.player.smooth(blend);
}
