//! Arcade physics capability
//!
//! The game only talks to physics through `PhysicsWorld`: spawn bodies, pair layers
//! for collision or overlap, step, and query ground contact. `ArcadeWorld` is the
//! bundled axis-aligned implementation.

pub mod aabb;
pub mod arcade;

pub use aabb::{Aabb, CollisionResult, aabb_collision, reflect_velocity};
pub use arcade::ArcadeWorld;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Handle to a body inside a physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Collision layer a dynamic body belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    Player,
    Collectible,
    Hazard,
}

/// Spawn parameters for a dynamic body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDesc {
    pub layer: Layer,
    /// Centre position
    pub pos: Vec2,
    /// Unscaled body size
    pub size: Vec2,
    pub scale: f32,
    pub vel: Vec2,
    /// Velocity kept after hitting something (0 = dead stop, 1 = perfect bounce)
    pub bounce: f32,
    pub collide_world_bounds: bool,
    pub allow_gravity: bool,
}

impl BodyDesc {
    pub fn new(layer: Layer, pos: Vec2, size: Vec2) -> Self {
        Self {
            layer,
            pos,
            size,
            scale: 1.0,
            vel: Vec2::ZERO,
            bounce: 0.0,
            collide_world_bounds: false,
            allow_gravity: true,
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_bounce(mut self, bounce: f32) -> Self {
        self.bounce = bounce;
        self
    }

    pub fn with_world_bounds(mut self) -> Self {
        self.collide_world_bounds = true;
        self
    }

    /// Body size after scaling
    pub fn scaled_size(&self) -> Vec2 {
        self.size * self.scale
    }
}

/// A pairing that fired during a step. `a` belongs to the first layer of the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Bodies were separated (registered with `add_collider`)
    Collide { a: BodyId, b: BodyId },
    /// Bodies overlap (registered with `add_overlap`)
    Overlap { a: BodyId, b: BodyId },
}

/// Physics capability consumed by the game controller
pub trait PhysicsWorld {
    /// Add a static platform every dynamic body collides with
    fn add_platform(&mut self, rect: Aabb);

    fn platforms(&self) -> &[Aabb];

    fn spawn(&mut self, desc: BodyDesc) -> BodyId;

    /// Separate bodies of the two layers and report each contact
    fn add_collider(&mut self, a: Layer, b: Layer);

    /// Report overlaps between the two layers without separating them
    fn add_overlap(&mut self, a: Layer, b: Layer);

    /// Advance by a frame delta and return the contacts that fired
    fn step(&mut self, dt: f32) -> Vec<Contact>;

    fn position(&self, id: BodyId) -> Option<Vec2>;

    fn velocity(&self, id: BodyId) -> Option<Vec2>;

    fn bounds(&self, id: BodyId) -> Option<Aabb>;

    fn set_velocity(&mut self, id: BodyId, vel: Vec2);

    fn set_velocity_x(&mut self, id: BodyId, vx: f32);

    fn set_velocity_y(&mut self, id: BodyId, vy: f32);

    /// Whether the body rested on a platform or the world floor during the last step
    fn is_grounded(&self, id: BodyId) -> bool;

    /// Deactivate and hide a body
    fn disable(&mut self, id: BodyId);

    /// Reactivate a body at `pos`, at rest
    fn enable(&mut self, id: BodyId, pos: Vec2);

    fn is_active(&self, id: BodyId) -> bool;

    /// Active bodies on a layer, in spawn order
    fn active_bodies(&self, layer: Layer) -> Vec<BodyId>;

    fn count_active(&self, layer: Layer) -> usize {
        self.active_bodies(layer).len()
    }

    /// Freeze integration and contact reporting
    fn pause(&mut self);

    fn resume(&mut self);

    fn is_paused(&self) -> bool;
}
