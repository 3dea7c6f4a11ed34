//! Multi-occupancy grid used for neighbor queries.

use crate::error::SimError;
use crate::world::terrain::Position;

/// Index of an agent in the simulation population.
pub type AgentId = usize;

/// Occupancy index over the same bounds as the terrain.
///
/// Agents are placed once and relocated afterwards; nothing is ever removed.
/// Each cell keeps arrival order, which is the iteration order callers see.
#[derive(Clone, Debug)]
pub struct SpatialIndex {
    size: i32,
    /// cells[y * size + x] holds the agents standing on (x, y)
    cells: Vec<Vec<AgentId>>,
}

/// Truncate a speed or alert distance to a whole-cell radius.
pub fn cell_radius(radius: f64) -> i32 {
    if radius.is_finite() && radius > 0.0 {
        radius as i32
    } else {
        0
    }
}

impl SpatialIndex {
    pub fn new(size: i32) -> Self {
        let size = size.max(0);
        Self {
            size,
            cells: vec![Vec::new(); size as usize * size as usize],
        }
    }

    fn slot(&self, pos: Position) -> Result<usize, SimError> {
        if (0..self.size).contains(&pos.x) && (0..self.size).contains(&pos.y) {
            Ok(pos.y as usize * self.size as usize + pos.x as usize)
        } else {
            Err(SimError::OutOfBounds {
                position: pos,
                map_size: self.size,
            })
        }
    }

    /// Register an agent on a cell.
    pub fn place(&mut self, id: AgentId, pos: Position) -> Result<(), SimError> {
        let slot = self.slot(pos)?;
        self.cells[slot].push(id);
        Ok(())
    }

    /// Move an agent between cells. Terrain legality is the caller's concern.
    pub fn relocate(&mut self, id: AgentId, from: Position, to: Position) -> Result<(), SimError> {
        let src = self.slot(from)?;
        let dst = self.slot(to)?;
        if src == dst {
            return Ok(());
        }
        if let Some(i) = self.cells[src].iter().position(|&a| a == id) {
            self.cells[src].remove(i);
        }
        self.cells[dst].push(id);
        Ok(())
    }

    /// Agents on a single cell, in arrival order.
    pub fn occupants(&self, pos: Position) -> Result<&[AgentId], SimError> {
        let slot = self.slot(pos)?;
        Ok(&self.cells[slot])
    }

    /// Cells within Chebyshev distance `radius` of `pos`, clipped to the grid.
    pub fn neighborhood_positions(
        &self,
        pos: Position,
        radius: f64,
        include_center: bool,
    ) -> Result<Vec<Position>, SimError> {
        self.slot(pos)?;
        let r = cell_radius(radius);
        let x_min = pos.x.saturating_sub(r).max(0);
        let x_max = pos.x.saturating_add(r).min(self.size - 1);
        let y_min = pos.y.saturating_sub(r).max(0);
        let y_max = pos.y.saturating_add(r).min(self.size - 1);

        let mut out =
            Vec::with_capacity((x_max - x_min + 1) as usize * (y_max - y_min + 1) as usize);
        for x in x_min..=x_max {
            for y in y_min..=y_max {
                if !include_center && x == pos.x && y == pos.y {
                    continue;
                }
                out.push(Position::new(x, y));
            }
        }
        Ok(out)
    }

    /// Agents standing within Chebyshev distance `radius` of `pos`.
    pub fn neighbors(
        &self,
        pos: Position,
        radius: f64,
        include_center: bool,
    ) -> Result<Vec<AgentId>, SimError> {
        let mut out = Vec::new();
        for cell in self.neighborhood_positions(pos, radius, include_center)? {
            out.extend_from_slice(&self.cells[self.slot(cell)?]);
        }
        Ok(out)
    }

    pub fn len(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Vec::is_empty)
    }
}
