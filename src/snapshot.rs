//! Read-only view of the session for the presentation layer

use serde::Serialize;

use crate::sim::{EntityId, GamePhase, GameState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenView {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    pub letter: char,
    pub slot: usize,
    /// Collected tokens are not drawn
    pub collected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectileView {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
}

/// Everything the presentation layer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub character_x: f32,
    pub tokens: Vec<TokenView>,
    pub projectiles: Vec<ProjectileView>,
    pub phrase: String,
    /// Collected phrase indices, ascending (for letter-by-letter highlight)
    pub collected: Vec<usize>,
    pub is_complete: bool,
    pub show_overlay: bool,
    /// Whether the fire button should look enabled
    pub can_fire: bool,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            phase: state.phase,
            character_x: state.player.x,
            tokens: state
                .store
                .tokens
                .values()
                .map(|t| TokenView {
                    id: t.id,
                    x: t.pos.x,
                    y: t.pos.y,
                    letter: t.letter,
                    slot: t.slot,
                    collected: t.collected,
                })
                .collect(),
            projectiles: state
                .store
                .active_projectiles()
                .map(|p| ProjectileView {
                    id: p.id,
                    x: p.pos.x,
                    y: p.pos.y,
                })
                .collect(),
            phrase: state.phrase.text(),
            collected: state.progress.iter().collect(),
            is_complete: state.complete,
            show_overlay: state.phase == GamePhase::Overlay,
            can_fire: state.can_fire(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_fresh_snapshot() {
        let state = GameState::new(Tuning::default(), 1);
        let snapshot = Snapshot::capture(&state);
        assert_eq!(snapshot.phase, GamePhase::Idle);
        assert!(snapshot.tokens.is_empty());
        assert!(snapshot.collected.is_empty());
        assert!(!snapshot.is_complete);
        assert!(!snapshot.show_overlay);
        assert!(!snapshot.can_fire);
    }

    #[test]
    fn test_json_shape() {
        let state = GameState::new(Tuning::default(), 1);
        let json = Snapshot::capture(&state).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["phase"], "Idle");
        assert_eq!(value["phrase"], "HAPPY NEW YEAR");
        assert_eq!(value["show_overlay"], false);
    }
}
