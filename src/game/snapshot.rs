//! Snapshot types for network transmission

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::combat::Projectile;
use super::{PlayerId, PlayerState};

/// Player state as seen by clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub x: f32,
    pub y: f32,
    pub hp: i32,
    pub score: u32,
}

/// Projectile position as seen by clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub x: f32,
    pub y: f32,
}

/// Immutable copy of the world after a tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Ticks completed so far
    pub tick: u64,
    /// Keyed by player handle; clients find themselves by matching their own id
    pub players: BTreeMap<PlayerId, PlayerView>,
    /// In spawn order
    pub projectiles: Vec<ProjectileView>,
}

impl WorldSnapshot {
    pub fn build(
        tick: u64,
        players: &BTreeMap<PlayerId, PlayerState>,
        projectiles: &[Projectile],
    ) -> Self {
        let players = players
            .iter()
            .map(|(id, p)| {
                (
                    *id,
                    PlayerView {
                        x: p.x,
                        y: p.y,
                        hp: p.health,
                        score: p.score,
                    },
                )
            })
            .collect();

        let projectiles = projectiles
            .iter()
            .map(|p| ProjectileView { x: p.x, y: p.y })
            .collect();

        Self {
            tick,
            players,
            projectiles,
        }
    }
}
