//! World state and the authoritative tick

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use super::combat::{CombatSystem, Flight, HitResult, Projectile, WeaponStats};
use super::physics::{MapBounds, PhysicsSystem};
use super::snapshot::WorldSnapshot;
use super::{InputState, PlayerId, ProjectileId, SimError};

/// Fixed world tuning, set once at construction
#[derive(Debug, Clone, PartialEq)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    /// Distance per nominal tick per held axis
    pub player_speed: f32,
    pub player_radius: f32,
    pub max_health: i32,
    /// Ticks per second the speeds are expressed against
    pub tick_rate: u32,
    pub weapon: WeaponStats,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 3000.0,
            height: 3000.0,
            player_speed: 5.0,
            player_radius: 20.0,
            max_health: 100,
            tick_rate: 60,
            weapon: WeaponStats::default(),
        }
    }
}

impl WorldConfig {
    /// Length of one nominal tick in seconds
    pub fn nominal_dt(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }

    pub fn bounds(&self) -> MapBounds {
        MapBounds::new(self.width, self.height)
    }
}

/// Player state (authoritative)
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub id: PlayerId,
    pub x: f32,
    pub y: f32,
    pub health: i32,
    pub score: u32,
    pub input: InputState,
}

impl PlayerState {
    pub fn new(id: PlayerId, x: f32, y: f32, health: i32) -> Self {
        Self {
            id,
            x,
            y,
            health,
            score: 0,
            input: InputState::default(),
        }
    }

    fn respawn(&mut self, x: f32, y: f32, health: i32) {
        self.x = x;
        self.y = y;
        self.health = health;
    }
}

/// The simulation. Owned by exactly one task; every method takes `&mut self`
/// or `&self`, so mutators can never overlap a tick.
pub struct Simulation {
    config: WorldConfig,
    bounds: MapBounds,
    tick: u64,
    players: BTreeMap<PlayerId, PlayerState>,
    projectiles: Vec<Projectile>,
    next_projectile_id: u64,
    rng: ChaCha8Rng,
}

impl Simulation {
    pub fn new(config: WorldConfig, seed: u64) -> Self {
        let bounds = config.bounds();
        Self {
            config,
            bounds,
            tick: 0,
            players: BTreeMap::new(),
            projectiles: Vec::new(),
            next_projectile_id: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Ticks completed so far
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn player(&self, id: PlayerId) -> Option<&PlayerState> {
        self.players.get(&id)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Insert a player at a random position with full health
    pub fn add_player(&mut self, id: PlayerId) -> Result<PlayerState, SimError> {
        if self.players.contains_key(&id) {
            return Err(SimError::DuplicatePlayer(id));
        }

        let (x, y) = self.bounds.random_point(&mut self.rng);
        let player = PlayerState::new(id, x, y, self.config.max_health);
        self.players.insert(id, player.clone());

        info!(
            player_id = %id,
            x,
            y,
            player_count = self.players.len(),
            "Player joined"
        );

        Ok(player)
    }

    /// Remove a player. Their projectiles keep flying.
    pub fn remove_player(&mut self, id: PlayerId) {
        if self.players.remove(&id).is_some() {
            info!(player_id = %id, player_count = self.players.len(), "Player left");
        }
    }

    /// Replace the held directions of a player
    pub fn set_input(&mut self, id: PlayerId, input: InputState) {
        if let Some(player) = self.players.get_mut(&id) {
            player.input = input;
        }
    }

    /// Fire from the player's current position. Returns the new projectile
    /// id, or `None` when the player is gone or the angle is not finite.
    pub fn spawn_projectile(&mut self, id: PlayerId, angle: f32) -> Option<ProjectileId> {
        if !angle.is_finite() {
            debug!(player_id = %id, "Dropping shot with non-finite angle");
            return None;
        }

        let player = self.players.get(&id)?;
        let projectile_id = ProjectileId(self.next_projectile_id);
        self.next_projectile_id += 1;

        self.projectiles.push(Projectile::new(
            projectile_id,
            id,
            player.x,
            player.y,
            angle,
            &self.config.weapon,
        ));

        Some(projectile_id)
    }

    /// Teleport a player, clamped into the map
    pub fn place_player(&mut self, id: PlayerId, x: f32, y: f32) -> bool {
        if !x.is_finite() || !y.is_finite() {
            return false;
        }
        let (x, y) = self.bounds.clamp(x, y);
        match self.players.get_mut(&id) {
            Some(player) => {
                player.x = x;
                player.y = y;
                true
            }
            None => false,
        }
    }

    /// Advance the world by `dt` seconds. All movement is applied before any
    /// projectile is checked against players.
    pub fn tick(&mut self, dt: f32) {
        let step = dt / self.config.nominal_dt();
        if !dt.is_finite() || dt <= 0.0 || !step.is_finite() {
            warn!(dt, "Skipping tick with invalid delta");
            return;
        }

        self.tick += 1;
        self.update_movement(step);
        self.update_projectiles(step);
    }

    /// Read-only copy of the current state
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::build(self.tick, &self.players, &self.projectiles)
    }

    fn update_movement(&mut self, step: f32) {
        for player in self.players.values_mut() {
            let (x, y) = PhysicsSystem::move_player(
                player.x,
                player.y,
                &player.input,
                self.config.player_speed,
                step,
                &self.bounds,
            );
            player.x = x;
            player.y = y;
        }
    }

    /// Rebuild the projectile list, dropping expired, escaped and spent ones
    fn update_projectiles(&mut self, step: f32) {
        let speed = self.config.weapon.projectile_speed;
        let projectiles = std::mem::take(&mut self.projectiles);
        let mut survivors = Vec::with_capacity(projectiles.len());

        for mut projectile in projectiles {
            if projectile.advance(speed, step, &self.bounds) != Flight::InFlight {
                continue;
            }

            match self.find_target(&projectile) {
                Some(target_id) => {
                    let hit = self.apply_hit(&projectile, target_id);
                    debug!(
                        projectile_id = hit.projectile_id.0,
                        shooter_id = %hit.shooter_id,
                        target_id = %hit.target_id,
                        damage = hit.damage,
                        killed = hit.target_killed,
                        "Hit registered"
                    );
                }
                None => survivors.push(projectile),
            }
        }

        self.projectiles = survivors;
    }

    /// First non-owner player the projectile overlaps, in id order
    fn find_target(&self, projectile: &Projectile) -> Option<PlayerId> {
        self.players
            .values()
            .filter(|p| p.id != projectile.owner_id)
            .find(|p| {
                projectile.check_hit(p.x, p.y, self.config.player_radius, &self.config.weapon)
            })
            .map(|p| p.id)
    }

    fn apply_hit(&mut self, projectile: &Projectile, target_id: PlayerId) -> HitResult {
        let damage = self.config.weapon.damage;
        let mut hit = HitResult {
            projectile_id: projectile.id,
            shooter_id: projectile.owner_id,
            target_id,
            damage,
            target_killed: false,
        };

        let Some(target) = self.players.get_mut(&target_id) else {
            return hit;
        };

        let (new_health, killed) = CombatSystem::apply_damage(target.health, damage);
        target.health = new_health;
        hit.target_killed = killed;

        if killed {
            let (x, y) = self.bounds.random_point(&mut self.rng);
            target.respawn(x, y, self.config.max_health);

            match self.players.get_mut(&projectile.owner_id) {
                Some(shooter) => {
                    shooter.score = shooter.score.saturating_add(1);
                    info!(
                        killer_id = %projectile.owner_id,
                        victim_id = %target_id,
                        score = shooter.score,
                        "Player killed"
                    );
                }
                None => {
                    debug!(
                        killer_id = %projectile.owner_id,
                        victim_id = %target_id,
                        "Kill by disconnected player, no score awarded"
                    );
                }
            }
        }

        hit
    }
}
