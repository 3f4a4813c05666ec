//! Intent buffer between the host's input events and the simulation
//!
//! The host may call the intent methods at any time between ticks; the
//! session drains the buffer exactly once at the start of each tick.

use std::collections::BTreeSet;

use crate::sim::TickInput;

/// A lateral direction the player can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    Left,
    Right,
}

#[derive(Debug, Clone, Default)]
pub struct IntentBuffer {
    /// Net discrete taps since the last drain
    steps: i32,
    /// Directions currently held (survives drains)
    held: BTreeSet<Direction>,
    fire: bool,
    replay: bool,
}

impl IntentBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_left(&mut self) {
        self.steps = self.steps.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.steps = self.steps.saturating_add(1);
    }

    pub fn press(&mut self, dir: Direction) {
        self.held.insert(dir);
    }

    pub fn release(&mut self, dir: Direction) {
        self.held.remove(&dir);
    }

    /// Repeated calls before the next tick still fire once
    pub fn fire(&mut self) {
        self.fire = true;
    }

    pub fn request_replay(&mut self) {
        self.replay = true;
    }

    /// Take a pending replay request
    pub fn take_replay(&mut self) -> bool {
        std::mem::take(&mut self.replay)
    }

    /// Turn pending intents into this tick's input and clear the one-shots
    pub fn drain(&mut self, idle_mode: bool) -> TickInput {
        TickInput {
            steps: std::mem::take(&mut self.steps),
            hold_left: self.held.contains(&Direction::Left),
            hold_right: self.held.contains(&Direction::Right),
            fire: std::mem::take(&mut self.fire),
            idle_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shots_clear_on_drain() {
        let mut buffer = IntentBuffer::new();
        buffer.move_left();
        buffer.move_left();
        buffer.move_right();
        buffer.fire();
        buffer.fire();

        let input = buffer.drain(false);
        assert_eq!(input.steps, -1);
        assert!(input.fire);

        assert_eq!(buffer.drain(false), TickInput::default());
    }

    #[test]
    fn test_held_survives_drain() {
        let mut buffer = IntentBuffer::new();
        buffer.press(Direction::Right);
        assert!(buffer.drain(false).hold_right);
        assert!(buffer.drain(false).hold_right);

        buffer.release(Direction::Right);
        assert!(!buffer.drain(false).hold_right);
    }

    #[test]
    fn test_replay_taken_once() {
        let mut buffer = IntentBuffer::new();
        buffer.request_replay();
        buffer.request_replay();
        assert!(buffer.take_replay());
        assert!(!buffer.take_replay());
    }
}
