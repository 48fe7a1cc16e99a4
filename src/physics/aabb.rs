//! Axis-aligned box geometry and contact resolution

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Penetration below this is treated as touching, not overlapping
pub const CONTACT_EPSILON: f32 = 0.01;

/// Axis-aligned box (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size.abs() / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Box from its top-left corner
    pub fn from_corner_size(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(Vec2::new(x, y), Vec2::new(x + width, y + height))
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Overlap depth on each axis, `None` when separated or only touching
    pub fn penetration(&self, other: &Aabb) -> Option<Vec2> {
        let dx = self.max.x.min(other.max.x) - self.min.x.max(other.min.x);
        let dy = self.max.y.min(other.max.y) - self.min.y.max(other.min.y);
        (dx > CONTACT_EPSILON && dy > CONTACT_EPSILON).then_some(Vec2::new(dx, dy))
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.penetration(other).is_some()
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Separation direction for the first box (unit axis)
    pub normal: Vec2,
    /// Penetration depth along `normal`
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check collision between two boxes, separating along the axis of least penetration
pub fn aabb_collision(a: &Aabb, b: &Aabb) -> CollisionResult {
    let Some(depth) = a.penetration(b) else {
        return CollisionResult::miss();
    };

    let delta = a.center() - b.center();
    let normal = if depth.x < depth.y {
        Vec2::new(if delta.x < 0.0 { -1.0 } else { 1.0 }, 0.0)
    } else {
        Vec2::new(0.0, if delta.y < 0.0 { -1.0 } else { 1.0 })
    };

    CollisionResult {
        hit: true,
        normal,
        penetration: depth.x.min(depth.y),
    }
}

/// Reflect the velocity component moving into the surface, scaled by `bounce`
pub fn reflect_velocity(velocity: Vec2, normal: Vec2, bounce: f32) -> Vec2 {
    let into = velocity.dot(normal);
    if into >= 0.0 {
        return velocity;
    }
    velocity - normal * into * (1.0 + bounce)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touching_boxes_do_not_overlap() {
        let a = Aabb::from_corner_size(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::from_corner_size(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(!aabb_collision(&a, &b).hit);
    }

    #[test]
    fn test_collision_picks_shallow_axis() {
        // `a` sinks 2px into the top of `b`
        let a = Aabb::from_corner_size(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::from_corner_size(-20.0, 8.0, 100.0, 10.0);

        let result = aabb_collision(&a, &b);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::new(0.0, -1.0));
        assert!((result.penetration - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_reflect_velocity() {
        // Falling onto a floor whose normal points up
        let reflected = reflect_velocity(Vec2::new(50.0, 100.0), Vec2::new(0.0, -1.0), 1.0);
        assert!((reflected.x - 50.0).abs() < 0.001);
        assert!((reflected.y + 100.0).abs() < 0.001);

        // Dead stop
        let stopped = reflect_velocity(Vec2::new(0.0, 100.0), Vec2::new(0.0, -1.0), 0.0);
        assert!(stopped.y.abs() < 0.001);

        // Moving away is untouched
        let away = reflect_velocity(Vec2::new(0.0, -100.0), Vec2::new(0.0, -1.0), 1.0);
        assert_eq!(away, Vec2::new(0.0, -100.0));
    }

    #[test]
    fn test_new_orders_corners() {
        let b = Aabb::new(Vec2::new(5.0, 5.0), Vec2::new(0.0, 0.0));
        assert_eq!(b.min, Vec2::ZERO);
        assert_eq!(b.size(), Vec2::new(5.0, 5.0));
        assert!(b.contains_point(Vec2::new(2.5, 2.5)));
    }
}
