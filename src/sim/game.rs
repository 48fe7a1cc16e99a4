//! The Game controller: one session on one level layout
//!
//! Each tick runs physics, dispatches the contacts to the star and bomb handlers,
//! then applies the movement input. Running, Paused and Over are the only phases;
//! Over is terminal for the controller.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collectibles::CollectibleSet;
use super::hazards::HazardSet;
use super::level::LevelLayout;
use super::session::{CollectOutcome, SessionState};
use crate::best_score::BestScore;
use crate::consts::*;
use crate::input::TickInput;
use crate::physics::{BodyDesc, BodyId, Contact, Layer, PhysicsWorld};
use crate::storage::KeyValueStore;
use crate::view::{DrawList, palette};

/// Current phase of the Game controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Frozen under the pause overlay
    Paused,
    /// Bomb hit; session finalized
    Over,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

/// Player sprite animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAnim {
    /// Walk cycle (frames 0-9 at 10 fps, looped)
    Walk,
    /// Standing frame
    Turn,
}

/// Gameplay events emitted during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    StarCollected { score: u64 },
    LevelComplete { level: u32 },
    Jumped,
    GameOver { final_score: u64, best_score: u64 },
}

/// Owns the session and the physics world it plays in
pub struct GameController<W> {
    world: W,
    rng: Pcg32,
    session: SessionState,
    phase: GamePhase,
    player: BodyId,
    stars: CollectibleSet,
    bombs: HazardSet,
    facing: Facing,
    anim: PlayerAnim,
    /// Red tint after the bomb hit
    tinted: bool,
    events: Vec<GameEvent>,
}

impl<W: PhysicsWorld> GameController<W> {
    /// Build the level in `world` and start a fresh session
    pub fn new(mut world: W, layout: &LevelLayout, seed: u64) -> Self {
        layout.build(&mut world);

        let player = world.spawn(
            BodyDesc::new(
                Layer::Player,
                Vec2::new(PLAYER_START_X, PLAYER_START_Y),
                Vec2::new(PLAYER_BODY_WIDTH, PLAYER_BODY_HEIGHT),
            )
            .with_scale(PLAYER_SCALE)
            .with_world_bounds(),
        );

        let stars = CollectibleSet::spawn(&mut world);
        world.add_overlap(Layer::Player, Layer::Collectible);

        let mut rng = Pcg32::seed_from_u64(seed);
        let mut bombs = HazardSet::new();
        world.add_collider(Layer::Player, Layer::Hazard);
        bombs.spawn(&mut world, PLAYER_START_X, &mut rng);

        log::info!("Session started (seed {})", seed);

        Self {
            world,
            rng,
            session: SessionState::new(),
            phase: GamePhase::Running,
            player,
            stars,
            bombs,
            facing: Facing::Right,
            anim: PlayerAnim::Turn,
            tinted: false,
            events: Vec::new(),
        }
    }

    /// Advance one frame. Does nothing unless Running.
    pub fn tick<S: KeyValueStore>(&mut self, input: &TickInput, dt: f32, best: &BestScore<S>) {
        if self.phase != GamePhase::Running {
            return;
        }

        for contact in self.world.step(dt) {
            match contact {
                Contact::Overlap { a, b } if a == self.player && self.stars.contains(b) => {
                    self.on_star_overlap(a, b);
                }
                Contact::Collide { a, b } if a == self.player && self.bombs.contains(b) => {
                    self.on_bomb_hit(a, b, best);
                }
                _ => {}
            }
        }

        if self.phase == GamePhase::Running {
            self.apply_movement(input);
        }
    }

    /// Movement policy. Jump is level-triggered: holding it re-launches on every
    /// grounded tick.
    fn apply_movement(&mut self, input: &TickInput) {
        if input.left {
            self.world.set_velocity_x(self.player, -RUN_SPEED);
            self.anim = PlayerAnim::Walk;
            self.facing = Facing::Left;
        } else if input.right {
            self.world.set_velocity_x(self.player, RUN_SPEED);
            self.anim = PlayerAnim::Walk;
            self.facing = Facing::Right;
        } else {
            self.world.set_velocity_x(self.player, 0.0);
            self.anim = PlayerAnim::Turn;
        }

        if input.jump && self.world.is_grounded(self.player) {
            self.world.set_velocity_y(self.player, JUMP_VELOCITY);
            self.events.push(GameEvent::Jumped);
        }
    }

    /// Player overlapped a star
    pub fn on_star_overlap(&mut self, _player: BodyId, star: BodyId) {
        if !self.session.is_alive() || !self.stars.take(&mut self.world, star) {
            return;
        }

        let remaining = self.stars.count_active(&self.world);
        match self.session.collect(STAR_POINTS, remaining) {
            CollectOutcome::Collected => {
                self.events.push(GameEvent::StarCollected {
                    score: self.session.score(),
                });
            }
            CollectOutcome::LevelComplete { level } => {
                self.events.push(GameEvent::StarCollected {
                    score: self.session.score(),
                });
                self.stars.replenish(&mut self.world);
                let player_x = self.player_position().x;
                self.bombs.spawn(&mut self.world, player_x, &mut self.rng);
                self.events.push(GameEvent::LevelComplete { level });
                log::info!("Level {} ({} bombs)", level, self.bombs.len());
            }
            CollectOutcome::Ignored => {}
        }
    }

    /// Player collided with a bomb: end the session and persist the best score
    pub fn on_bomb_hit<S: KeyValueStore>(
        &mut self,
        _player: BodyId,
        _bomb: BodyId,
        best: &BestScore<S>,
    ) {
        if !self.session.hit() {
            return;
        }

        self.world.pause();
        self.tinted = true;
        self.anim = PlayerAnim::Turn;
        self.phase = GamePhase::Over;

        if let Some(final_score) = self.session.finalize() {
            let best_score = best.write_if_greater(final_score);
            log::info!(
                "Game over: score {} (best {}) at level {}",
                final_score,
                best_score,
                self.session.level()
            );
            self.events.push(GameEvent::GameOver {
                final_score,
                best_score,
            });
        }
    }

    /// Running -> Paused. Returns whether the phase changed.
    pub fn pause(&mut self) -> bool {
        if self.phase != GamePhase::Running {
            return false;
        }
        self.phase = GamePhase::Paused;
        true
    }

    /// Paused -> Running. Returns whether the phase changed.
    pub fn resume(&mut self) -> bool {
        if self.phase != GamePhase::Paused {
            return false;
        }
        self.phase = GamePhase::Running;
        true
    }

    /// Events since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    /// Direct world access, for drivers and tests that stage a situation
    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn player(&self) -> BodyId {
        self.player
    }

    pub fn player_position(&self) -> Vec2 {
        self.world
            .position(self.player)
            .unwrap_or(Vec2::new(PLAYER_START_X, PLAYER_START_Y))
    }

    pub fn stars(&self) -> &CollectibleSet {
        &self.stars
    }

    pub fn bombs(&self) -> &HazardSet {
        &self.bombs
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn anim(&self) -> PlayerAnim {
        self.anim
    }

    pub fn is_tinted(&self) -> bool {
        self.tinted
    }

    /// Platforms, stars, bombs, player and the score line
    pub fn draw(&self, out: &mut DrawList) {
        for platform in self.world.platforms() {
            out.rect(*platform, palette::GRASS);
        }
        for &star in self.stars.ids() {
            if let Some(rect) = self.world.bounds(star).filter(|_| self.world.is_active(star)) {
                out.rect(rect, palette::STAR);
            }
        }
        for &bomb in self.bombs.ids() {
            if let Some(rect) = self.world.bounds(bomb) {
                out.rect(rect, palette::BOMB);
            }
        }
        if let Some(rect) = self.world.bounds(self.player) {
            let color = if self.tinted {
                palette::FOX_HIT
            } else {
                palette::FOX
            };
            out.rect(rect, color);
        }

        out.text(
            Vec2::new(16.0, 16.0),
            self.session.score_text(),
            32.0,
            palette::SCORE_TEXT,
        );
        out.text(
            Vec2::new(16.0, 52.0),
            format!("Level: {}", self.session.level()),
            24.0,
            palette::SCORE_TEXT,
        );
    }
}
