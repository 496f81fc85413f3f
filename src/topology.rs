//! Toroidal single-occupancy grid and the lookup interface agents use.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{agent::AgentId, error::SimError};

/// Cell coordinates on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: u32,
    pub y: u32,
}

impl GridPos {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Neighbor and location lookups for agents.
pub trait TopologyProvider {
    fn location_of(&self, agent: AgentId) -> Option<GridPos>;

    /// Occupants of the Moore window around `pos`, in a fixed cell order.
    fn neighbors_of(&self, pos: GridPos) -> Vec<AgentId>;
}

/// Moore offsets, row by row from the north-west corner.
const MOORE_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

pub struct TorusGrid {
    width: u32,
    height: u32,
    cells: Vec<Option<AgentId>>,
    locations: Vec<Option<GridPos>>,
}

impl TorusGrid {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
            locations: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn occupant(&self, pos: GridPos) -> Option<AgentId> {
        self.index(pos).and_then(|index| self.cells[index])
    }

    pub fn is_free(&self, pos: GridPos) -> bool {
        self.index(pos).is_some() && self.occupant(pos).is_none()
    }

    /// Puts a not yet placed agent on an empty cell.
    pub fn place(&mut self, agent: AgentId, pos: GridPos) -> Result<(), SimError> {
        let index = self.index(pos).ok_or(SimError::OutOfBounds(pos))?;
        if let Some(occupant) = self.cells[index] {
            return Err(SimError::CellOccupied { pos, occupant });
        }
        let slot = agent.raw() as usize;
        if self.locations.len() <= slot {
            self.locations.resize(slot + 1, None);
        }
        if self.locations[slot].is_some() {
            return Err(SimError::AlreadyPlaced(agent));
        }
        self.cells[index] = Some(agent);
        self.locations[slot] = Some(pos);
        Ok(())
    }

    /// Every cell in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = GridPos> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| GridPos::new(x, y)))
    }

    pub fn free_positions(&self) -> Vec<GridPos> {
        self.positions().filter(|&pos| self.is_free(pos)).collect()
    }

    /// Distinct cells around `pos` with wraparound, never `pos` itself.
    /// Grids narrower than three cells yield fewer than eight.
    pub fn moore_cells(&self, pos: GridPos) -> Vec<GridPos> {
        let mut cells = Vec::with_capacity(MOORE_OFFSETS.len());
        for (dx, dy) in MOORE_OFFSETS {
            let cell = self.wrap(pos.x as i64 + dx, pos.y as i64 + dy);
            if cell != pos && !cells.contains(&cell) {
                cells.push(cell);
            }
        }
        cells
    }

    fn wrap(&self, x: i64, y: i64) -> GridPos {
        GridPos::new(
            x.rem_euclid(self.width as i64) as u32,
            y.rem_euclid(self.height as i64) as u32,
        )
    }

    fn index(&self, pos: GridPos) -> Option<usize> {
        if pos.x < self.width && pos.y < self.height {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }
}

impl TopologyProvider for TorusGrid {
    fn location_of(&self, agent: AgentId) -> Option<GridPos> {
        self.locations.get(agent.raw() as usize).copied().flatten()
    }

    fn neighbors_of(&self, pos: GridPos) -> Vec<AgentId> {
        self.moore_cells(pos)
            .into_iter()
            .filter_map(|cell| self.occupant(cell))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moore_window_wraps_at_corner() {
        let grid = TorusGrid::new(5, 4);
        let cells = grid.moore_cells(GridPos::new(0, 0));
        assert_eq!(
            cells,
            vec![
                GridPos::new(4, 3),
                GridPos::new(0, 3),
                GridPos::new(1, 3),
                GridPos::new(4, 0),
                GridPos::new(1, 0),
                GridPos::new(4, 1),
                GridPos::new(0, 1),
                GridPos::new(1, 1),
            ]
        );
    }

    #[test]
    fn narrow_grid_has_no_duplicate_neighbors() {
        let grid = TorusGrid::new(2, 2);
        let cells = grid.moore_cells(GridPos::new(0, 0));
        assert_eq!(cells.len(), 3);
        assert!(!cells.contains(&GridPos::new(0, 0)));
    }

    #[test]
    fn neighbors_skip_empty_cells() {
        let mut grid = TorusGrid::new(3, 3);
        grid.place(AgentId::new(0), GridPos::new(1, 1)).unwrap();
        grid.place(AgentId::new(1), GridPos::new(0, 0)).unwrap();
        grid.place(AgentId::new(2), GridPos::new(2, 2)).unwrap();
        assert_eq!(
            grid.neighbors_of(GridPos::new(1, 1)),
            vec![AgentId::new(1), AgentId::new(2)]
        );
        assert_eq!(grid.location_of(AgentId::new(2)), Some(GridPos::new(2, 2)));
        assert_eq!(grid.location_of(AgentId::new(7)), None);
    }

    #[test]
    fn single_occupancy_is_enforced() {
        let mut grid = TorusGrid::new(3, 3);
        grid.place(AgentId::new(0), GridPos::new(1, 1)).unwrap();
        assert!(matches!(
            grid.place(AgentId::new(1), GridPos::new(1, 1)),
            Err(SimError::CellOccupied { .. })
        ));
        assert!(matches!(
            grid.place(AgentId::new(0), GridPos::new(2, 1)),
            Err(SimError::AlreadyPlaced(_))
        ));
        assert!(matches!(
            grid.place(AgentId::new(2), GridPos::new(3, 0)),
            Err(SimError::OutOfBounds(_))
        ));
        assert_eq!(grid.free_positions().len(), 8);
    }
}
