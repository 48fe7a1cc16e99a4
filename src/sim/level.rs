//! Static platform layout for the playfield

use serde::{Deserialize, Serialize};

use crate::consts::{WORLD_HEIGHT, WORLD_WIDTH};
use crate::physics::{Aabb, PhysicsWorld};

/// Tile size of the grass tileset
pub const TILE_SIZE: f32 = 32.0;

/// A platform in tile units, top-left anchored
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatformTiles {
    pub col: u32,
    pub row: u32,
    pub width: u32,
    pub height: u32,
}

impl PlatformTiles {
    pub fn rect(&self) -> Aabb {
        Aabb::from_corner_size(
            self.col as f32 * TILE_SIZE,
            self.row as f32 * TILE_SIZE,
            self.width as f32 * TILE_SIZE,
            self.height as f32 * TILE_SIZE,
        )
    }
}

/// Every solid platform of a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    pub platforms: Vec<PlatformTiles>,
}

impl Default for LevelLayout {
    /// Grass floor plus four ledges, sized for the 1000x750 playfield
    fn default() -> Self {
        let cols = (WORLD_WIDTH / TILE_SIZE).ceil() as u32;
        let floor_row = (WORLD_HEIGHT / TILE_SIZE) as u32 - 1;
        let tiles = |col, row, width| PlatformTiles {
            col,
            row,
            width,
            height: 1,
        };

        Self {
            platforms: vec![
                PlatformTiles {
                    col: 0,
                    row: floor_row,
                    width: cols,
                    height: 2,
                },
                tiles(18, 16, 10),
                tiles(0, 12, 9),
                tiles(22, 9, 9),
                tiles(10, 6, 7),
            ],
        }
    }
}

impl LevelLayout {
    /// Add every platform to a physics world
    pub fn build(&self, world: &mut impl PhysicsWorld) {
        for platform in &self.platforms {
            world.add_platform(platform.rect());
        }
    }
}
