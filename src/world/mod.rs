pub mod spatial;
pub mod terrain;

pub use spatial::{AgentId, SpatialIndex};
pub use terrain::{Position, Terrain, TerrainGrid};

use crate::config::ecology::LandRegion;
use crate::error::SimError;

/// Grid context threaded through every movement and agent step.
#[derive(Debug, Clone)]
pub struct World {
    pub terrain: TerrainGrid,
    pub index: SpatialIndex,
}

impl World {
    pub fn new(size: i32, land: &LandRegion) -> Self {
        Self {
            terrain: TerrainGrid::new(size, land),
            index: SpatialIndex::new(size),
        }
    }

    pub fn size(&self) -> i32 {
        self.terrain.size()
    }

    /// Keep only the cells of the given terrain, preserving order.
    pub fn cells_of(&self, cells: Vec<Position>, terrain: Terrain) -> Result<Vec<Position>, SimError> {
        let mut kept = Vec::with_capacity(cells.len());
        for cell in cells {
            if self.terrain.terrain_at(cell)? == terrain {
                kept.push(cell);
            }
        }
        Ok(kept)
    }
}
