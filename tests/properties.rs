//! Property-based invariant tests for the greeting simulation.
//!
//! For arbitrary interleavings of player intents and ticks:
//!
//! 1. Every required letter is exactly one of queued, falling, or collected.
//! 2. Collected letters are never uncollected (progress only grows).
//! 3. Without fire intents nothing is collected and the queue never shrinks
//!    below what is in the air.
//! 4. Completion is signalled at most once per round.
//! 5. The character never leaves the lateral band.

use proptest::prelude::*;
use star_greeting::consts::{LATERAL_MAX, LATERAL_MIN};
use star_greeting::input::Direction;
use star_greeting::sim::GameEvent;
use star_greeting::{Session, Tuning};

#[derive(Debug, Clone)]
enum Op {
    Left,
    Right,
    Press(Direction),
    Release(Direction),
    Fire,
    Step(u32),
}

fn dir_strategy() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Left), Just(Direction::Right)]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => Just(Op::Left),
        2 => Just(Op::Right),
        1 => dir_strategy().prop_map(Op::Press),
        1 => dir_strategy().prop_map(Op::Release),
        3 => Just(Op::Fire),
        6 => (1u32..40).prop_map(Op::Step),
    ]
}

fn op_without_fire_strategy() -> impl Strategy<Value = Op> {
    op_strategy().prop_filter("no fire", |op| !matches!(op, Op::Fire))
}

/// Short phrase with a repeated letter and a fast spawner, so tokens pile up
fn busy_tuning() -> Tuning {
    Tuning {
        phrase: "HI HI".to_string(),
        spawn_interval_ms: 300,
        entrance_delay_ms: 50,
        overlay_delay_ms: 200,
        ..Tuning::default()
    }
}

/// Apply ops, calling `check` after every tick
fn run(
    seed: u64,
    ops: &[Op],
    mut check: impl FnMut(&Session) -> Result<(), TestCaseError>,
) -> Result<Session, TestCaseError> {
    let mut session = Session::silent(busy_tuning(), seed).unwrap();
    for op in ops {
        match op {
            Op::Left => session.move_left(),
            Op::Right => session.move_right(),
            Op::Press(dir) => session.press(*dir),
            Op::Release(dir) => session.release(*dir),
            Op::Fire => session.fire(),
            Op::Step(n) => {
                for _ in 0..*n {
                    session.step();
                    check(&session)?;
                }
            }
        }
    }
    Ok(session)
}

proptest! {
    #[test]
    fn letters_are_conserved(
        seed in any::<u64>(),
        ops in prop::collection::vec(op_strategy(), 0..120),
    ) {
        run(seed, &ops, |session| {
            let state = session.state();
            prop_assert!(state.letters_conserved(), "slot lost or duplicated: {:?}", state.queue);
            let in_air = state.store.uncollected_tokens().count();
            prop_assert_eq!(
                state.queue.len() + state.progress.len() + in_air,
                state.phrase.required()
            );
            Ok(())
        })?;
    }

    #[test]
    fn progress_only_grows(
        seed in any::<u64>(),
        ops in prop::collection::vec(op_strategy(), 0..120),
    ) {
        let mut seen: Vec<usize> = Vec::new();
        run(seed, &ops, |session| {
            let now: Vec<usize> = session.state().progress.iter().collect();
            for slot in &seen {
                prop_assert!(now.contains(slot), "slot {} was uncollected", slot);
            }
            seen = now;
            Ok(())
        })?;
    }

    #[test]
    fn nothing_collected_without_fire(
        seed in any::<u64>(),
        ops in prop::collection::vec(op_without_fire_strategy(), 0..120),
    ) {
        run(seed, &ops, |session| {
            let state = session.state();
            prop_assert!(state.progress.is_empty());
            prop_assert!(state.store.projectiles.is_empty());
            prop_assert_eq!(
                state.queue.len() + state.store.uncollected_tokens().count(),
                state.phrase.required()
            );
            Ok(())
        })?;
    }

    #[test]
    fn character_stays_in_band(
        seed in any::<u64>(),
        ops in prop::collection::vec(op_strategy(), 0..120),
    ) {
        run(seed, &ops, |session| {
            let player = &session.state().player;
            prop_assert!((LATERAL_MIN..=LATERAL_MAX).contains(&player.x));
            prop_assert!((LATERAL_MIN..=LATERAL_MAX).contains(&player.target_x));
            Ok(())
        })?;
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn completion_signalled_at_most_once(seed in any::<u64>(), extra in 0u32..600) {
        let mut session = Session::silent(busy_tuning(), seed).unwrap();
        session.set_idle_mode(true);

        let mut completions = 0;
        for _ in 0..(20_000 + extra) {
            session.step();
            completions += session
                .take_events()
                .iter()
                .filter(|e| **e == GameEvent::Completed)
                .count();
        }
        prop_assert!(completions <= 1);
        prop_assert_eq!(completions == 1, session.state().complete);
    }
}
