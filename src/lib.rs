//! Fox Likes Stars - a small star-collecting platformer
//!
//! Core modules:
//! - `sim`: Session state, collectibles, hazards and the Game controller
//! - `scene`: Scene router and the Boot / MainMenu / Game / Pause controllers
//! - `physics`: Arcade physics capability and the bundled AABB world
//! - `storage` / `best_score`: Key-value persistence and the best-score register
//! - `settings`: Player preferences persisted next to the best score
//! - `audio`: Music and sound-effect playback capability
//! - `input`: Per-tick input snapshot
//! - `view`: Flat draw list consumed by the platform drivers

pub mod audio;
pub mod best_score;
pub mod input;
pub mod physics;
pub mod scene;
pub mod settings;
pub mod sim;
pub mod storage;
pub mod view;

pub use best_score::BestScore;
pub use settings::{ReturnToMenu, Settings};

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (pixels, y grows downward)
    pub const WORLD_WIDTH: f32 = 1000.0;
    pub const WORLD_HEIGHT: f32 = 750.0;

    /// Arcade physics rate and gravity (pixels/s²)
    pub const PHYSICS_FPS: f32 = 120.0;
    pub const SIM_DT: f32 = 1.0 / PHYSICS_FPS;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    pub const GRAVITY: f32 = 1200.0;

    /// Player defaults
    pub const PLAYER_START_X: f32 = 100.0;
    pub const PLAYER_START_Y: f32 = 600.0;
    pub const PLAYER_SCALE: f32 = 0.18;
    /// Unscaled body size of the walk sheet frame
    pub const PLAYER_BODY_WIDTH: f32 = 300.0;
    pub const PLAYER_BODY_HEIGHT: f32 = 450.0;
    pub const RUN_SPEED: f32 = 300.0;
    pub const JUMP_VELOCITY: f32 = -560.0;

    /// Stars: one row dropped from the top of the playfield
    pub const STAR_COUNT: usize = 14;
    pub const STAR_START_X: f32 = 12.0;
    pub const STAR_STEP_X: f32 = 70.0;
    pub const STAR_WIDTH: f32 = 24.0;
    pub const STAR_HEIGHT: f32 = 22.0;
    pub const STAR_POINTS: u64 = 10;

    /// Bombs
    pub const BOMB_SIZE: f32 = 14.0;
    pub const BOMB_SPAWN_Y: f32 = 16.0;
    /// Player x below this sends the bomb to the far range
    pub const BOMB_SIDE_SPLIT: f32 = 400.0;
    pub const BOMB_FAR_RANGE: (i32, i32) = (400, 800);
    pub const BOMB_NEAR_RANGE: (i32, i32) = (0, 400);
    pub const BOMB_MAX_SPEED_X: i32 = 200;
    pub const BOMB_FALL_SPEED: f32 = 20.0;
}
