//! Fixed timestep arcade physics
//!
//! Dynamic axis-aligned bodies under gravity, static platforms, world bounds and
//! layer pairings. Each axis is integrated and resolved separately, x first, so a
//! body resting on a platform never snags on it while running.

use glam::Vec2;

use super::aabb::{Aabb, aabb_collision, reflect_velocity};
use super::{BodyDesc, BodyId, Contact, Layer, PhysicsWorld};
use crate::consts::{GRAVITY, MAX_SUBSTEPS, SIM_DT};

/// Largest frame delta accepted by `step` (longer frames are clamped)
const MAX_FRAME_DT: f32 = 0.1;

#[derive(Debug, Clone, Copy)]
struct Body {
    layer: Layer,
    pos: Vec2,
    half: Vec2,
    vel: Vec2,
    bounce: f32,
    collide_world_bounds: bool,
    allow_gravity: bool,
    active: bool,
    grounded: bool,
}

impl Body {
    fn aabb(&self) -> Aabb {
        Aabb::new(self.pos - self.half, self.pos + self.half)
    }
}

/// The bundled `PhysicsWorld`
#[derive(Debug, Clone)]
pub struct ArcadeWorld {
    width: f32,
    height: f32,
    gravity: f32,
    platforms: Vec<Aabb>,
    /// Indexed by `BodyId`
    bodies: Vec<Body>,
    colliders: Vec<(Layer, Layer)>,
    overlaps: Vec<(Layer, Layer)>,
    accumulator: f32,
    paused: bool,
}

impl ArcadeWorld {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            gravity: GRAVITY,
            platforms: Vec::new(),
            bodies: Vec::new(),
            colliders: Vec::new(),
            overlaps: Vec::new(),
            accumulator: 0.0,
            paused: false,
        }
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.0 as usize)
    }

    fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id.0 as usize)
    }

    fn active_ids(&self, layer: Layer) -> impl Iterator<Item = usize> + '_ {
        self.bodies
            .iter()
            .enumerate()
            .filter(move |(_, b)| b.active && b.layer == layer)
            .map(|(i, _)| i)
    }

    fn substep(&mut self, dt: f32, contacts: &mut Vec<Contact>) {
        let bounds = Vec2::new(self.width, self.height);
        for body in self.bodies.iter_mut().filter(|b| b.active) {
            integrate_body(body, &self.platforms, bounds, self.gravity, dt);
        }

        for i in 0..self.colliders.len() {
            let (la, lb) = self.colliders[i];
            self.resolve_colliders(la, lb, contacts);
        }

        for &(la, lb) in &self.overlaps {
            for a in self.active_ids(la) {
                for b in self.active_ids(lb) {
                    if a == b || !self.bodies[a].aabb().overlaps(&self.bodies[b].aabb()) {
                        continue;
                    }
                    let contact = Contact::Overlap {
                        a: BodyId(a as u32),
                        b: BodyId(b as u32),
                    };
                    if !contacts.contains(&contact) {
                        contacts.push(contact);
                    }
                }
            }
        }
    }

    fn resolve_colliders(&mut self, la: Layer, lb: Layer, contacts: &mut Vec<Contact>) {
        let firsts: Vec<usize> = self.active_ids(la).collect();
        let seconds: Vec<usize> = self.active_ids(lb).collect();

        for &a in &firsts {
            for &b in &seconds {
                if a == b {
                    continue;
                }
                let mut body_a = self.bodies[a];
                let mut body_b = self.bodies[b];
                let result = aabb_collision(&body_a.aabb(), &body_b.aabb());
                if !result.hit {
                    continue;
                }

                // Split the separation between both bodies
                let push = result.normal * result.penetration / 2.0;
                body_a.pos += push;
                body_b.pos -= push;
                body_a.vel = reflect_velocity(body_a.vel, result.normal, body_a.bounce);
                body_b.vel = reflect_velocity(body_b.vel, -result.normal, body_b.bounce);
                self.bodies[a] = body_a;
                self.bodies[b] = body_b;

                let contact = Contact::Collide {
                    a: BodyId(a as u32),
                    b: BodyId(b as u32),
                };
                if !contacts.contains(&contact) {
                    contacts.push(contact);
                }
            }
        }
    }
}

/// Semi-implicit Euler step for one body, then platform and world-bounds resolution
fn integrate_body(body: &mut Body, platforms: &[Aabb], bounds: Vec2, gravity: f32, dt: f32) {
    body.grounded = false;

    if body.allow_gravity {
        body.vel.y += gravity * dt;
    }

    // Horizontal pass
    body.pos.x += body.vel.x * dt;
    for platform in platforms {
        if body.aabb().penetration(platform).is_none() {
            continue;
        }
        let moving_right = if body.vel.x != 0.0 {
            body.vel.x > 0.0
        } else {
            body.pos.x < platform.center().x
        };
        body.pos.x = if moving_right {
            platform.min.x - body.half.x
        } else {
            platform.max.x + body.half.x
        };
        body.vel.x = -body.vel.x * body.bounce;
    }

    // Vertical pass
    body.pos.y += body.vel.y * dt;
    for platform in platforms {
        if body.aabb().penetration(platform).is_none() {
            continue;
        }
        let moving_down = if body.vel.y != 0.0 {
            body.vel.y > 0.0
        } else {
            body.pos.y < platform.center().y
        };
        if moving_down {
            body.pos.y = platform.min.y - body.half.y;
            body.grounded = true;
        } else {
            body.pos.y = platform.max.y + body.half.y;
        }
        body.vel.y = -body.vel.y * body.bounce;
    }

    if !body.collide_world_bounds {
        return;
    }

    if body.pos.x - body.half.x < 0.0 {
        body.pos.x = body.half.x;
        if body.vel.x < 0.0 {
            body.vel.x = -body.vel.x * body.bounce;
        }
    } else if body.pos.x + body.half.x > bounds.x {
        body.pos.x = bounds.x - body.half.x;
        if body.vel.x > 0.0 {
            body.vel.x = -body.vel.x * body.bounce;
        }
    }

    if body.pos.y - body.half.y < 0.0 {
        body.pos.y = body.half.y;
        if body.vel.y < 0.0 {
            body.vel.y = -body.vel.y * body.bounce;
        }
    } else if body.pos.y + body.half.y > bounds.y {
        body.pos.y = bounds.y - body.half.y;
        body.grounded = true;
        if body.vel.y > 0.0 {
            body.vel.y = -body.vel.y * body.bounce;
        }
    }
}

impl PhysicsWorld for ArcadeWorld {
    fn add_platform(&mut self, rect: Aabb) {
        self.platforms.push(rect);
    }

    fn platforms(&self) -> &[Aabb] {
        &self.platforms
    }

    fn spawn(&mut self, desc: BodyDesc) -> BodyId {
        let id = BodyId(self.bodies.len() as u32);
        self.bodies.push(Body {
            layer: desc.layer,
            pos: desc.pos,
            half: desc.scaled_size().abs() / 2.0,
            vel: desc.vel,
            bounce: desc.bounce,
            collide_world_bounds: desc.collide_world_bounds,
            allow_gravity: desc.allow_gravity,
            active: true,
            grounded: false,
        });
        id
    }

    fn add_collider(&mut self, a: Layer, b: Layer) {
        if !self.colliders.contains(&(a, b)) {
            self.colliders.push((a, b));
        }
    }

    fn add_overlap(&mut self, a: Layer, b: Layer) {
        if !self.overlaps.contains(&(a, b)) {
            self.overlaps.push((a, b));
        }
    }

    fn step(&mut self, dt: f32) -> Vec<Contact> {
        let mut contacts = Vec::new();
        if self.paused {
            return contacts;
        }

        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.substep(SIM_DT, &mut contacts);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop any backlog the substep cap left behind
        self.accumulator = self.accumulator.min(SIM_DT);

        contacts
    }

    fn position(&self, id: BodyId) -> Option<Vec2> {
        self.body(id).map(|b| b.pos)
    }

    fn velocity(&self, id: BodyId) -> Option<Vec2> {
        self.body(id).map(|b| b.vel)
    }

    fn bounds(&self, id: BodyId) -> Option<Aabb> {
        self.body(id).map(Body::aabb)
    }

    fn set_velocity(&mut self, id: BodyId, vel: Vec2) {
        if let Some(body) = self.body_mut(id) {
            body.vel = vel;
        }
    }

    fn set_velocity_x(&mut self, id: BodyId, vx: f32) {
        if let Some(body) = self.body_mut(id) {
            body.vel.x = vx;
        }
    }

    fn set_velocity_y(&mut self, id: BodyId, vy: f32) {
        if let Some(body) = self.body_mut(id) {
            body.vel.y = vy;
        }
    }

    fn is_grounded(&self, id: BodyId) -> bool {
        self.body(id).is_some_and(|b| b.active && b.grounded)
    }

    fn disable(&mut self, id: BodyId) {
        if let Some(body) = self.body_mut(id) {
            body.active = false;
            body.grounded = false;
        }
    }

    fn enable(&mut self, id: BodyId, pos: Vec2) {
        if let Some(body) = self.body_mut(id) {
            body.active = true;
            body.pos = pos;
            body.vel = Vec2::ZERO;
            body.grounded = false;
        }
    }

    fn is_active(&self, id: BodyId) -> bool {
        self.body(id).is_some_and(|b| b.active)
    }

    fn active_bodies(&self, layer: Layer) -> Vec<BodyId> {
        self.active_ids(layer).map(|i| BodyId(i as u32)).collect()
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn resume(&mut self) {
        self.paused = false;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}
