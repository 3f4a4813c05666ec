//! Side-effect hooks the session calls out to
//!
//! Both hooks are fire-and-forget: the simulation never waits on them.

/// Audio feedback collaborator
pub trait AudioHooks {
    /// A letter was collected (short confirmation tone)
    fn on_letter_collected(&mut self);
    /// The player interacted for the first time (start the ambient loop)
    fn on_first_interaction(&mut self);
}

/// Silent audio
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioHooks for NullAudio {
    fn on_letter_collected(&mut self) {}
    fn on_first_interaction(&mut self) {}
}

/// Counts hook calls instead of making sound (headless runs, tests)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordingAudio {
    pub tones: u32,
    pub ambient_starts: u32,
}

impl AudioHooks for RecordingAudio {
    fn on_letter_collected(&mut self) {
        self.tones += 1;
    }

    fn on_first_interaction(&mut self) {
        self.ambient_starts += 1;
    }
}
