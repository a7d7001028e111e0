//! Player movement and map bounds

use rand::Rng;

use super::InputState;

/// Rectangular play area [0, width] x [0, height]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    pub width: f32,
    pub height: f32,
}

impl MapBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Clamp a point into the map (edges are inclusive)
    pub fn clamp(&self, x: f32, y: f32) -> (f32, f32) {
        (x.clamp(0.0, self.width), y.clamp(0.0, self.height))
    }

    /// Check if a point lies inside the map, edges included
    pub fn contains(&self, x: f32, y: f32) -> bool {
        (0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
    }

    /// Uniformly random point inside the map
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> (f32, f32) {
        let x = rng.gen_range(0.0..=self.width);
        let y = rng.gen_range(0.0..=self.height);
        (x, y)
    }
}

/// Physics system for updating player positions
pub struct PhysicsSystem;

impl PhysicsSystem {
    /// Move a player by its held input and clamp into bounds.
    /// `step` is the fraction of a nominal tick being simulated.
    /// Diagonals are not normalized: holding two directions covers more ground.
    pub fn move_player(
        x: f32,
        y: f32,
        input: &InputState,
        speed: f32,
        step: f32,
        bounds: &MapBounds,
    ) -> (f32, f32) {
        let (dir_x, dir_y) = input.axis();
        let new_x = x + dir_x * speed * step;
        let new_y = y + dir_y * speed * step;
        bounds.clamp(new_x, new_y)
    }

    /// Strict circle overlap test: distance < combined radius
    pub fn circles_overlap(x1: f32, y1: f32, x2: f32, y2: f32, combined_radius: f32) -> bool {
        (x2 - x1).hypot(y2 - y1) < combined_radius
    }
}
