//! Projectile vs. letter token hit detection
//!
//! Proximity is an axis-aligned box test: both the horizontal and vertical
//! distance must be under the hit radius.
//!
//! Tie-break: projectiles are resolved in ascending id. Each one credits the
//! qualifying token closest vertically, then closest horizontally, then with
//! the lowest id. A token can only be credited once per tick.

use std::cmp::Ordering;

use glam::Vec2;

use super::state::{EntityId, EntityStore, LetterToken};

/// One projectile striking one token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub projectile: EntityId,
    pub token: EntityId,
    pub slot: usize,
    pub letter: char,
}

/// Axis-aligned proximity test
#[inline]
pub fn in_hit_box(a: Vec2, b: Vec2, radius: f32) -> bool {
    (a.x - b.x).abs() < radius && (a.y - b.y).abs() < radius
}

/// Ordering of candidate tokens for a projectile at `origin`
fn closeness(origin: Vec2, a: &LetterToken, b: &LetterToken) -> Ordering {
    let dy_a = (a.pos.y - origin.y).abs();
    let dy_b = (b.pos.y - origin.y).abs();
    let dx_a = (a.pos.x - origin.x).abs();
    let dx_b = (b.pos.x - origin.x).abs();
    dy_a.total_cmp(&dy_b)
        .then(dx_a.total_cmp(&dx_b))
        .then(a.id.cmp(&b.id))
}

/// Detect hits, mark the involved entities, and purge them
///
/// Returns hits in projectile id order. Collected tokens and spent
/// projectiles are removed from the store before returning.
pub fn resolve(store: &mut EntityStore, hit_radius: f32) -> Vec<Hit> {
    let EntityStore {
        tokens, projectiles, ..
    } = store;
    let mut hits = Vec::new();

    for projectile in projectiles.values_mut().filter(|p| p.active) {
        let target = tokens
            .values()
            .filter(|t| !t.collected && in_hit_box(t.pos, projectile.pos, hit_radius))
            .min_by(|a, b| closeness(projectile.pos, a, b))
            .map(|t| t.id);

        let Some(token_id) = target else { continue };
        if let Some(token) = tokens.get_mut(&token_id) {
            token.collected = true;
            projectile.active = false;
            hits.push(Hit {
                projectile: projectile.id,
                token: token.id,
                slot: token.slot,
                letter: token.letter,
            });
        }
    }

    tokens.retain(|_, t| !t.collected);
    projectiles.retain(|_, p| p.active);
    hits
}
