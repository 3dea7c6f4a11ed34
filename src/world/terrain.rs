use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::config::ecology::LandRegion;
use crate::error::SimError;

// === Enums ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terrain {
    Water,
    Land,
}

// === Position ===

/// Integer grid cell. Valid cells satisfy `0 <= x, y < map_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn as_dvec2(self) -> DVec2 {
        DVec2::new(self.x as f64, self.y as f64)
    }

    /// Euclidean distance, used for ranking candidate cells.
    pub fn distance(self, other: Position) -> f64 {
        self.as_dvec2().distance(other.as_dvec2())
    }

    /// Chebyshev (Moore) distance.
    pub fn chebyshev(self, other: Position) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

// === TerrainGrid ===

/// Square water field with one axis-aligned land rectangle. Read-only after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainGrid {
    size: i32,
    cells: Vec<Terrain>,
}

impl TerrainGrid {
    pub fn new(size: i32, land: &LandRegion) -> Self {
        let size = size.max(0);
        let side = size as usize;
        let mut cells = vec![Terrain::Water; side * side];
        for x in land.x[0].max(0)..land.x[1].min(size) {
            for y in land.y[0].max(0)..land.y[1].min(size) {
                cells[y as usize * side + x as usize] = Terrain::Land;
            }
        }
        Self { size, cells }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn contains(&self, pos: Position) -> bool {
        (0..self.size).contains(&pos.x) && (0..self.size).contains(&pos.y)
    }

    pub fn terrain_at(&self, pos: Position) -> Result<Terrain, SimError> {
        if !self.contains(pos) {
            return Err(SimError::OutOfBounds {
                position: pos,
                map_size: self.size,
            });
        }
        Ok(self.cells[pos.y as usize * self.size as usize + pos.x as usize])
    }

    pub fn count(&self, terrain: Terrain) -> usize {
        self.cells.iter().filter(|&&t| t == terrain).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_grid() -> TerrainGrid {
        TerrainGrid::new(
            200,
            &LandRegion {
                x: [50, 80],
                y: [50, 100],
            },
        )
    }

    #[test]
    fn land_rectangle_is_half_open() {
        let grid = reference_grid();
        assert_eq!(grid.terrain_at(Position::new(50, 50)), Ok(Terrain::Land));
        assert_eq!(grid.terrain_at(Position::new(79, 99)), Ok(Terrain::Land));
        assert_eq!(grid.terrain_at(Position::new(80, 60)), Ok(Terrain::Water));
        assert_eq!(grid.terrain_at(Position::new(60, 100)), Ok(Terrain::Water));
        assert_eq!(grid.terrain_at(Position::new(49, 50)), Ok(Terrain::Water));
    }

    #[test]
    fn land_cell_count_matches_rectangle() {
        let grid = reference_grid();
        assert_eq!(grid.count(Terrain::Land), 30 * 50);
        assert_eq!(grid.count(Terrain::Water), 200 * 200 - 30 * 50);
    }

    #[test]
    fn out_of_bounds_query_fails() {
        let grid = reference_grid();
        for pos in [
            Position::new(-1, 0),
            Position::new(0, -1),
            Position::new(200, 5),
            Position::new(5, 200),
        ] {
            assert_eq!(
                grid.terrain_at(pos),
                Err(SimError::OutOfBounds {
                    position: pos,
                    map_size: 200
                })
            );
        }
    }

    #[test]
    fn repeated_queries_are_stable() {
        let grid = reference_grid();
        for x in (0..200).step_by(7) {
            for y in (0..200).step_by(11) {
                let pos = Position::new(x, y);
                let first = grid.terrain_at(pos).unwrap();
                for _ in 0..3 {
                    assert_eq!(grid.terrain_at(pos).unwrap(), first);
                }
            }
        }
    }

    #[test]
    fn region_outside_map_is_clipped() {
        let grid = TerrainGrid::new(10, &LandRegion { x: [8, 20], y: [-5, 2] });
        assert_eq!(grid.count(Terrain::Land), 2 * 2);
        assert_eq!(grid.terrain_at(Position::new(9, 0)), Ok(Terrain::Land));
    }

    #[test]
    fn distances() {
        let a = Position::new(0, 0);
        let b = Position::new(3, 4);
        assert!((a.distance(b) - 5.0).abs() < 1e-12);
        assert_eq!(a.chebyshev(b), 4);
    }
}
