//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod kinematics;
pub mod progress;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Hit, in_hit_box};
pub use spawner::SpawnPolicy;
pub use state::{
    EntityId, EntityStore, GameEvent, GamePhase, GameState, LetterToken, Phrase, Player,
    ProgressSet, Projectile, RngState, WorkQueue,
};
pub use tick::{TickInput, fire, tick};
