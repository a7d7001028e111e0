//! Static world metadata sent once per connection

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::physics::MapBounds;

/// Decorative obstacle. Nothing collides with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub r: f32,
}

/// Map dimensions plus scenery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldMap {
    pub width: f32,
    pub height: f32,
    pub obstacles: Vec<Obstacle>,
}

impl WorldMap {
    pub const MIN_OBSTACLE_RADIUS: f32 = 30.0;
    pub const MAX_OBSTACLE_RADIUS: f32 = 80.0;

    /// Scatter `count` obstacles uniformly over the map
    pub fn generate<R: Rng + ?Sized>(bounds: &MapBounds, count: usize, rng: &mut R) -> Self {
        let obstacles = (0..count)
            .map(|_| {
                let (x, y) = bounds.random_point(rng);
                Obstacle {
                    x,
                    y,
                    r: rng.gen_range(Self::MIN_OBSTACLE_RADIUS..Self::MAX_OBSTACLE_RADIUS),
                }
            })
            .collect();

        Self {
            width: bounds.width,
            height: bounds.height,
            obstacles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn generates_requested_obstacles_in_bounds() {
        let bounds = MapBounds::new(3000.0, 2000.0);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let map = WorldMap::generate(&bounds, 50, &mut rng);

        assert_eq!(map.obstacles.len(), 50);
        assert_eq!(map.width, 3000.0);
        for o in &map.obstacles {
            assert!(bounds.contains(o.x, o.y));
            assert!(o.r >= WorldMap::MIN_OBSTACLE_RADIUS && o.r < WorldMap::MAX_OBSTACLE_RADIUS);
        }
    }
}
