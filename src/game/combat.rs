//! Combat system - projectiles, damage, hit detection

use super::physics::{MapBounds, PhysicsSystem};
use super::{PlayerId, ProjectileId};

/// Fixed weapon tuning shared by every player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponStats {
    /// Health removed per hit
    pub damage: i32,
    /// Distance travelled per nominal tick
    pub projectile_speed: f32,
    /// Projectile hitbox radius
    pub projectile_radius: f32,
    /// Lifetime in ticks; `None` lives until it leaves the map
    pub projectile_lifetime: Option<u32>,
}

impl Default for WeaponStats {
    fn default() -> Self {
        Self {
            damage: 10,
            projectile_speed: 12.0,
            projectile_radius: 5.0,
            projectile_lifetime: Some(100),
        }
    }
}

/// Active projectile in the world
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: ProjectileId,
    pub owner_id: PlayerId,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub remaining_life: Option<u32>,
}

/// What happened to a projectile after it moved this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flight {
    InFlight,
    Expired,
    OutOfBounds,
}

impl Projectile {
    pub fn new(
        id: ProjectileId,
        owner_id: PlayerId,
        x: f32,
        y: f32,
        angle: f32,
        stats: &WeaponStats,
    ) -> Self {
        Self {
            id,
            owner_id,
            x,
            y,
            angle,
            remaining_life: stats.projectile_lifetime,
        }
    }

    /// Advance one step and decrement the life budget
    pub fn advance(&mut self, speed: f32, step: f32, bounds: &MapBounds) -> Flight {
        self.x += self.angle.cos() * speed * step;
        self.y += self.angle.sin() * speed * step;

        if let Some(life) = self.remaining_life.as_mut() {
            *life = life.saturating_sub(1);
            if *life == 0 {
                return Flight::Expired;
            }
        }

        // NaN fails `contains`, so corrupted positions drop here too
        if !bounds.contains(self.x, self.y) {
            return Flight::OutOfBounds;
        }

        Flight::InFlight
    }

    /// Check collision with a player
    pub fn check_hit(
        &self,
        target_x: f32,
        target_y: f32,
        target_radius: f32,
        stats: &WeaponStats,
    ) -> bool {
        PhysicsSystem::circles_overlap(
            self.x,
            self.y,
            target_x,
            target_y,
            target_radius + stats.projectile_radius,
        )
    }
}

/// Combat system for applying damage
pub struct CombatSystem;

impl CombatSystem {
    /// Apply damage to health, returns (new_health, is_dead)
    pub fn apply_damage(current_health: i32, damage: i32) -> (i32, bool) {
        let new_health = (current_health - damage).max(0);
        (new_health, new_health == 0)
    }
}

/// Hit result from combat resolution
#[derive(Debug, Clone, PartialEq)]
pub struct HitResult {
    pub projectile_id: ProjectileId,
    pub shooter_id: PlayerId,
    pub target_id: PlayerId,
    pub damage: i32,
    pub target_killed: bool,
}
