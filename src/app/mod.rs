//! Application wiring

pub mod state;

pub use state::AppState;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::config::Config;
use crate::game::{Simulation, TickScheduler, WorldMap};

/// Build the simulation, its scheduler and the shared state around them.
/// The caller decides where the scheduler runs.
pub fn build(config: Config) -> (AppState, TickScheduler) {
    let seed = config
        .world_seed
        .unwrap_or_else(|| rand::thread_rng().next_u64());
    info!(seed, "World seed");

    let world = config.world();
    let mut map_rng = ChaCha8Rng::seed_from_u64(seed ^ 0x5eed);
    let world_map = WorldMap::generate(&world.bounds(), config.obstacle_count, &mut map_rng);

    let (scheduler, handle) = TickScheduler::new(Simulation::new(world, seed), config.tick_rate);
    let state = AppState::new(config, handle, world_map);

    (state, scheduler)
}
