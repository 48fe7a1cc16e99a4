//! Bombs and the spawn rule that keeps them away from the player

use glam::Vec2;
use rand::Rng;

use crate::consts::*;
use crate::physics::{BodyDesc, BodyId, Layer, PhysicsWorld};

/// Where and how a new bomb enters play
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardSpawn {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Pick a spawn for the next bomb.
///
/// x comes from the half of the playfield the player is not standing in (strict
/// less-than on the split, so a player exactly on it gets a near-side bomb); the
/// horizontal speed is uniform in ±`BOMB_MAX_SPEED_X`. Both draws are inclusive
/// integers, x first.
pub fn hazard_spawn(player_x: f32, rng: &mut impl Rng) -> HazardSpawn {
    let (lo, hi) = if player_x < BOMB_SIDE_SPLIT {
        BOMB_FAR_RANGE
    } else {
        BOMB_NEAR_RANGE
    };
    let x = rng.random_range(lo..=hi) as f32;
    let vx = rng.random_range(-BOMB_MAX_SPEED_X..=BOMB_MAX_SPEED_X) as f32;

    HazardSpawn {
        pos: Vec2::new(x, BOMB_SPAWN_Y),
        vel: Vec2::new(vx, BOMB_FALL_SPEED),
    }
}

/// Bombs in play, oldest first
#[derive(Debug, Clone, Default)]
pub struct HazardSet {
    bombs: Vec<BodyId>,
}

impl HazardSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn one more bomb relative to the player's position
    pub fn spawn(
        &mut self,
        world: &mut impl PhysicsWorld,
        player_x: f32,
        rng: &mut impl Rng,
    ) -> BodyId {
        let spawn = hazard_spawn(player_x, rng);
        let id = world.spawn(
            BodyDesc::new(Layer::Hazard, spawn.pos, Vec2::splat(BOMB_SIZE))
                .with_velocity(spawn.vel)
                .with_bounce(1.0)
                .with_world_bounds(),
        );
        log::debug!(
            "Bomb {} spawned at x={} vx={}",
            id.0,
            spawn.pos.x,
            spawn.vel.x
        );
        self.bombs.push(id);
        id
    }

    pub fn len(&self) -> usize {
        self.bombs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bombs.is_empty()
    }

    pub fn ids(&self) -> &[BodyId] {
        &self.bombs
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.bombs.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::ArcadeWorld;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_player_left_of_split_gets_far_bomb() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..200 {
            let spawn = hazard_spawn(350.0, &mut rng);
            assert!((400.0..=800.0).contains(&spawn.pos.x));
        }
    }

    #[test]
    fn test_player_right_of_split_gets_near_bomb() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..200 {
            let spawn = hazard_spawn(450.0, &mut rng);
            assert!((0.0..=400.0).contains(&spawn.pos.x));
        }
    }

    #[test]
    fn test_split_tie_goes_near() {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..50 {
            assert!(hazard_spawn(400.0, &mut rng).pos.x <= 400.0);
        }
    }

    #[test]
    fn test_velocity_ranges() {
        let mut rng = Pcg32::seed_from_u64(99);
        for _ in 0..200 {
            let spawn = hazard_spawn(100.0, &mut rng);
            assert!((-200.0..=200.0).contains(&spawn.vel.x));
            assert_eq!(spawn.vel.y, 20.0);
            assert_eq!(spawn.pos.y, 16.0);
            assert_eq!(spawn.vel.x.fract(), 0.0);
        }
    }

    #[test]
    fn test_seeded_spawns_are_reproducible() {
        let mut a = Pcg32::seed_from_u64(2024);
        let mut b = Pcg32::seed_from_u64(2024);
        for x in [10.0, 500.0, 399.0, 999.0] {
            assert_eq!(hazard_spawn(x, &mut a), hazard_spawn(x, &mut b));
        }
    }

    #[test]
    fn test_spawned_bomb_is_bouncy_body() {
        let mut world = ArcadeWorld::new(1000.0, 750.0);
        let mut rng = Pcg32::seed_from_u64(3);
        let mut bombs = HazardSet::new();

        let id = bombs.spawn(&mut world, 100.0, &mut rng);
        assert_eq!(bombs.len(), 1);
        assert!(bombs.contains(id));
        assert_eq!(world.count_active(Layer::Hazard), 1);
        assert_eq!(world.velocity(id).unwrap().y, 20.0);
    }
}
