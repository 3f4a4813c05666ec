//! End-to-end scenarios driven through the public `Session` API.

use star_greeting::consts::SIM_DT_MS;
use star_greeting::sim::{GameEvent, GamePhase};
use star_greeting::{RecordingAudio, Session, Tuning, ms_to_ticks};

/// "AB", no sway, steady fall, and a spawn interval long enough that only
/// one token is ever in the air.
fn ab_tuning() -> Tuning {
    Tuning {
        phrase: "AB".to_string(),
        sway_amplitude: 0.0,
        fall_speed_min: 0.4,
        fall_speed_max: 0.4,
        spawn_interval_ms: 10_000,
        entrance_delay_ms: 0,
        ..Tuning::default()
    }
}

fn step_until<A: star_greeting::AudioHooks>(
    session: &mut Session<A>,
    max_ticks: u32,
    mut pred: impl FnMut(&GameEvent) -> bool,
) -> Option<GameEvent> {
    for _ in 0..max_ticks {
        session.step();
        if let Some(event) = session.take_events().into_iter().find(|e| pred(e)) {
            return Some(event);
        }
    }
    None
}

#[test]
fn two_letter_phrase_reaches_overlay() {
    let mut session = Session::new(ab_tuning(), 2025, RecordingAudio::default()).unwrap();
    session.set_idle_mode(true);

    let first = step_until(&mut session, 2_000, |e| {
        matches!(e, GameEvent::LetterCollected { .. })
    });
    assert!(matches!(
        first,
        Some(GameEvent::LetterCollected { slot: 0, letter: 'A', .. })
    ));
    assert_eq!(session.state().progress.iter().collect::<Vec<_>>(), vec![0]);
    assert_eq!(session.state().queue.to_vec(), vec![1]);
    assert!(!session.snapshot().is_complete);

    let done = step_until(&mut session, 2_000, |e| *e == GameEvent::Completed);
    assert!(done.is_some());
    assert_eq!(session.state().progress.iter().collect::<Vec<_>>(), vec![0, 1]);
    assert!(session.snapshot().is_complete);
    assert!(!session.snapshot().show_overlay);

    // Overlay appears exactly 1500 ms of ticks after completion
    let delay = ms_to_ticks(1500);
    for _ in 1..delay {
        session.step();
        assert!(!session.snapshot().show_overlay);
    }
    session.step();
    assert!(session.snapshot().show_overlay);
    assert_eq!(session.audio().tones, 2);
}

#[test]
fn completion_is_signalled_once() {
    let mut session = Session::silent(ab_tuning(), 7).unwrap();
    session.set_idle_mode(true);

    let mut completions = 0;
    for _ in 0..5_000 {
        session.step();
        completions += session
            .take_events()
            .iter()
            .filter(|e| **e == GameEvent::Completed)
            .count();
    }
    assert_eq!(completions, 1);
    assert_eq!(session.state().phase, GamePhase::Overlay);
}

#[test]
fn missed_token_goes_to_back_of_queue() {
    let mut session = Session::silent(ab_tuning(), 3).unwrap();

    session.step();
    assert_eq!(session.state().queue.to_vec(), vec![1]);

    let missed = step_until(&mut session, 400, |e| {
        matches!(e, GameEvent::TokenMissed { .. })
    });
    assert!(matches!(missed, Some(GameEvent::TokenMissed { slot: 0, .. })));
    assert_eq!(session.state().queue.to_vec(), vec![1, 0]);
    assert!(session.state().progress.is_empty());
}

#[test]
fn back_to_back_fire_is_ignored_during_cooldown() {
    let mut session = Session::silent(ab_tuning(), 11).unwrap();

    session.fire();
    session.step();
    assert_eq!(session.snapshot().projectiles.len(), 1);
    assert!(!session.snapshot().can_fire);

    session.fire();
    session.step();
    assert_eq!(session.snapshot().projectiles.len(), 1);

    // Rises 3 per tick from 85; gone within 40 ticks whether it hits or not
    let resolved = step_until(&mut session, 40, |e| {
        matches!(
            e,
            GameEvent::ProjectileExpired { .. } | GameEvent::LetterCollected { .. }
        )
    });
    assert!(resolved.is_some());
    assert!(session.snapshot().can_fire);

    session.fire();
    session.step();
    assert_eq!(session.snapshot().projectiles.len(), 1);
}

#[test]
fn replay_restores_initial_snapshot() {
    let tuning = ab_tuning();
    let pristine = Session::silent(tuning.clone(), 5).unwrap().snapshot();

    let mut session = Session::silent(tuning, 5).unwrap();
    session.set_idle_mode(true);
    session.move_left();
    for _ in 0..400 {
        session.step();
    }
    assert!(!session.state().progress.is_empty());

    session.replay();
    session.step();

    assert_eq!(session.snapshot(), pristine);
    assert_eq!(session.state().queue.to_vec(), vec![0, 1]);
    assert!(session.state().progress.is_empty());
}

#[test]
fn replay_from_overlay_starts_over() {
    let mut session = Session::silent(ab_tuning(), 9).unwrap();
    session.set_idle_mode(true);
    for _ in 0..5_000 {
        session.step();
        if session.snapshot().show_overlay {
            break;
        }
    }
    assert!(session.snapshot().show_overlay);

    session.replay();
    session.step();
    let snapshot = session.snapshot();
    assert_eq!(snapshot.phase, GamePhase::Idle);
    assert!(!snapshot.show_overlay);
    assert!(!snapshot.is_complete);

    // And the new round plays to the end too
    for _ in 0..5_000 {
        session.step();
        if session.snapshot().show_overlay {
            break;
        }
    }
    assert!(session.snapshot().show_overlay);
}

#[test]
fn refresh_timestamps_drive_the_round() {
    let mut session = Session::silent(Tuning::default(), 42).unwrap();
    session.set_idle_mode(true);

    // Frames at 60 Hz with an occasional stall
    let mut now = 0.0;
    for frame in 0..36_000u32 {
        now += if frame % 500 == 499 { 250.0 } else { SIM_DT_MS };
        assert!(session.frame(now));
        if session.snapshot().show_overlay {
            break;
        }
    }
    let snapshot = session.snapshot();
    assert!(snapshot.show_overlay);
    assert_eq!(snapshot.collected.len(), session.state().phrase.required());

    session.stop();
    assert!(!session.frame(now + SIM_DT_MS));
}
