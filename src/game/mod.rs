//! Game simulation modules

pub mod combat;
pub mod physics;
pub mod scheduler;
pub mod simulation;
pub mod snapshot;
pub mod world;

pub use scheduler::{SimHandle, TickScheduler};
pub use simulation::{PlayerState, Simulation, WorldConfig};
pub use snapshot::{PlayerView, ProjectileView, WorldSnapshot};
pub use world::{Obstacle, WorldMap};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque per-connection player handle, allocated by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Projectile identity, unique for the process lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectileId(pub u64);

/// Currently held movement directions for one player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    #[serde(default)]
    pub up: bool,
    #[serde(default)]
    pub down: bool,
    #[serde(default)]
    pub left: bool,
    #[serde(default)]
    pub right: bool,
}

impl InputState {
    /// Unnormalized direction: each axis is -1, 0 or 1
    pub fn axis(&self) -> (f32, f32) {
        let x = (self.right as i8 - self.left as i8) as f32;
        let y = (self.down as i8 - self.up as i8) as f32;
        (x, y)
    }
}

/// Mutation request queued by the gateway and applied before the next tick
#[derive(Debug, Clone)]
pub enum SimCommand {
    Connect(PlayerId),
    Disconnect(PlayerId),
    Movement(PlayerId, InputState),
    Shoot(PlayerId, f32),
}

/// Simulation errors surfaced to callers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    #[error("Player {0} is already in the simulation")]
    DuplicatePlayer(PlayerId),
}
