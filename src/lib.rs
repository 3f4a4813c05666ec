//! Star Greeting - an animated greeting mini-game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, kinematics, collisions, progress)
//! - `session`: Host-facing controller (intents in, snapshots out)
//! - `clock`: Display-refresh timestamps to fixed simulation ticks
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences

pub mod clock;
pub mod hooks;
pub mod input;
pub mod session;
pub mod settings;
pub mod sim;
pub mod snapshot;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use hooks::{AudioHooks, NullAudio, RecordingAudio};
pub use session::Session;
pub use settings::Settings;
pub use snapshot::Snapshot;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
///
/// The playfield is normalized to 0..100 on both axes, y growing downward.
pub mod consts {
    /// Fixed simulation timestep (one display refresh at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Same timestep in milliseconds, for the frame clock
    pub const SIM_DT_MS: f64 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Larger frame gaps (tab switch, debugger) are clamped to this
    pub const MAX_FRAME_GAP_MS: f64 = 100.0;

    /// Lateral bounds for the character and falling tokens
    pub const LATERAL_MIN: f32 = 5.0;
    pub const LATERAL_MAX: f32 = 95.0;
    /// Tokens spawn at least this far from either side
    pub const SPAWN_MARGIN: f32 = 10.0;

    /// Tokens enter just above the visible top edge
    pub const TOKEN_SPAWN_Y: f32 = -5.0;
    /// Tokens below this are out of play
    pub const TOKEN_EXIT_Y: f32 = 100.0;

    /// Projectiles leave from the character's row
    pub const PROJECTILE_START_Y: f32 = 85.0;
    /// Projectiles above this are out of play
    pub const PROJECTILE_EXIT_Y: f32 = -10.0;

    /// Character defaults
    pub const CHARACTER_START_X: f32 = 50.0;
    /// Smoothed character position snaps to target inside this distance
    pub const SNAP_EPSILON: f32 = 0.01;
}

/// Clamp a horizontal coordinate into the playable lateral band
#[inline]
pub fn clamp_lateral(x: f32) -> f32 {
    x.clamp(consts::LATERAL_MIN, consts::LATERAL_MAX)
}

/// Convert a wall-clock duration to a whole number of simulation ticks
#[inline]
pub fn ms_to_ticks(ms: u32) -> u32 {
    (f64::from(ms) / consts::SIM_DT_MS).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ms_to_ticks() {
        assert_eq!(ms_to_ticks(0), 0);
        assert_eq!(ms_to_ticks(1500), 90);
        assert_eq!(ms_to_ticks(2000), 120);
        // Rounds to nearest tick
        assert_eq!(ms_to_ticks(20), 1);
    }

    #[test]
    fn test_clamp_lateral() {
        assert_eq!(clamp_lateral(-20.0), consts::LATERAL_MIN);
        assert_eq!(clamp_lateral(50.0), 50.0);
        assert_eq!(clamp_lateral(140.0), consts::LATERAL_MAX);
    }
}
