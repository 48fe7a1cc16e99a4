//! The row of stars for the current level

use glam::Vec2;

use crate::consts::{STAR_COUNT, STAR_HEIGHT, STAR_START_X, STAR_STEP_X, STAR_WIDTH};
use crate::physics::{BodyDesc, BodyId, Layer, PhysicsWorld};

/// Stars in spawn order (left to right)
#[derive(Debug, Clone)]
pub struct CollectibleSet {
    stars: Vec<BodyId>,
}

impl CollectibleSet {
    /// Spawn the full row at the top of the playfield
    pub fn spawn(world: &mut impl PhysicsWorld) -> Self {
        let stars = (0..STAR_COUNT)
            .map(|i| {
                let x = STAR_START_X + STAR_STEP_X * i as f32;
                world.spawn(BodyDesc::new(
                    Layer::Collectible,
                    Vec2::new(x, 0.0),
                    Vec2::new(STAR_WIDTH, STAR_HEIGHT),
                ))
            })
            .collect();
        Self { stars }
    }

    pub fn total(&self) -> usize {
        self.stars.len()
    }

    pub fn ids(&self) -> &[BodyId] {
        &self.stars
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.stars.contains(&id)
    }

    pub fn count_active(&self, world: &impl PhysicsWorld) -> usize {
        self.stars.iter().filter(|&&id| world.is_active(id)).count()
    }

    pub fn is_depleted(&self, world: &impl PhysicsWorld) -> bool {
        self.count_active(world) == 0
    }

    /// Remove a star from play. False if it is not ours or already taken.
    pub fn take(&self, world: &mut impl PhysicsWorld, id: BodyId) -> bool {
        if !self.contains(id) || !world.is_active(id) {
            return false;
        }
        world.disable(id);
        true
    }

    /// Re-enable every star at its column, dropped from the top again
    pub fn replenish(&self, world: &mut impl PhysicsWorld) {
        for &id in &self.stars {
            let x = world.position(id).map_or(0.0, |p| p.x);
            world.enable(id, Vec2::new(x, 0.0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::ArcadeWorld;

    #[test]
    fn test_spawn_row() {
        let mut world = ArcadeWorld::new(1000.0, 750.0);
        let stars = CollectibleSet::spawn(&mut world);

        assert_eq!(stars.total(), 14);
        assert_eq!(stars.count_active(&world), 14);
        let first = world.position(stars.ids()[0]).unwrap();
        let last = world.position(stars.ids()[13]).unwrap();
        assert_eq!(first, Vec2::new(12.0, 0.0));
        assert_eq!(last, Vec2::new(12.0 + 70.0 * 13.0, 0.0));
    }

    #[test]
    fn test_take_and_replenish() {
        let mut world = ArcadeWorld::new(1000.0, 750.0);
        let stars = CollectibleSet::spawn(&mut world);
        let id = stars.ids()[3];

        assert!(stars.take(&mut world, id));
        assert!(!stars.take(&mut world, id), "already taken");
        assert_eq!(stars.count_active(&world), 13);

        for &id in stars.ids() {
            stars.take(&mut world, id);
        }
        assert!(stars.is_depleted(&world));

        stars.replenish(&mut world);
        assert_eq!(stars.count_active(&world), 14);
        assert_eq!(world.position(id).unwrap(), Vec2::new(12.0 + 70.0 * 3.0, 0.0));
    }

    #[test]
    fn test_take_foreign_body() {
        let mut world = ArcadeWorld::new(1000.0, 750.0);
        let stars = CollectibleSet::spawn(&mut world);
        let other = world.spawn(BodyDesc::new(Layer::Hazard, Vec2::ZERO, Vec2::ONE));
        assert!(!stars.take(&mut world, other));
        assert!(world.is_active(other));
    }
}
