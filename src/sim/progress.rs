//! Letter collection bookkeeping and the one-shot completion signal

use super::collision::Hit;
use super::state::{GameEvent, GamePhase, GameState};
use crate::ms_to_ticks;

/// Record a hit in the progress set
///
/// The work queue is not touched: the slot already left it when its token
/// spawned. Returns false if the slot was already collected.
pub fn record(state: &mut GameState, hit: &Hit) -> bool {
    if !state.progress.insert(hit.slot) {
        log::debug!("Slot {} already collected, ignoring", hit.slot);
        return false;
    }

    log::debug!(
        "Collected '{}' (slot {}), {}/{}",
        hit.letter,
        hit.slot,
        state.progress.len(),
        state.phrase.required()
    );
    state.emit(GameEvent::LetterCollected {
        slot: hit.slot,
        letter: hit.letter,
        token: hit.token,
        projectile: hit.projectile,
    });
    check_completion(state);
    true
}

/// Raise completion exactly once when the progress set is full
///
/// Schedules the overlay after the configured delay (immediately if the
/// delay is zero).
pub fn check_completion(state: &mut GameState) -> bool {
    if state.complete || state.progress.len() < state.phrase.required() {
        return false;
    }

    state.complete = true;
    log::info!("Phrase '{}' complete", state.phrase.text());
    state.emit(GameEvent::Completed);
    state.set_phase(GamePhase::Complete);

    let delay = ms_to_ticks(state.tuning.overlay_delay_ms);
    if delay == 0 {
        show_overlay(state);
    } else {
        state.overlay_countdown = Some(delay);
    }
    true
}

/// Count down toward the overlay; call once per tick while complete
pub fn update_overlay_countdown(state: &mut GameState) {
    let Some(remaining) = state.overlay_countdown else {
        return;
    };
    let remaining = remaining.saturating_sub(1);
    if remaining == 0 {
        show_overlay(state);
    } else {
        state.overlay_countdown = Some(remaining);
    }
}

fn show_overlay(state: &mut GameState) {
    state.overlay_countdown = None;
    state.set_phase(GamePhase::Overlay);
    state.emit(GameEvent::OverlayShown);
}
