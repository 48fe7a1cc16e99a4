//! Deterministic gameplay
//!
//! All session logic lives here. This module must stay deterministic:
//! - Physics advances in fixed substeps
//! - Seeded RNG only
//! - Bodies are visited in spawn order
//! - No rendering or platform dependencies

pub mod collectibles;
pub mod game;
pub mod hazards;
pub mod level;
pub mod session;

pub use collectibles::CollectibleSet;
pub use game::{Facing, GameController, GameEvent, GamePhase, PlayerAnim};
pub use hazards::{HazardSet, HazardSpawn, hazard_spawn};
pub use level::{LevelLayout, PlatformTiles, TILE_SIZE};
pub use session::{CollectOutcome, SessionState};
