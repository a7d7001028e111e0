//! Application state shared across routes

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::Config;
use crate::game::{PlayerId, SimHandle, WorldMap};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sim: SimHandle,
    pub world_map: Arc<WorldMap>,
    next_player_id: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(config: Config, sim: SimHandle, world_map: WorldMap) -> Self {
        Self {
            config: Arc::new(config),
            sim,
            world_map: Arc::new(world_map),
            next_player_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Fresh handle for a new connection, never reused while the process lives
    pub fn allocate_player_id(&self) -> PlayerId {
        PlayerId(self.next_player_id.fetch_add(1, Ordering::Relaxed))
    }
}
