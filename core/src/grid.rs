use core::ops::{Index, IndexMut};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Rectangular board of cells, fixed in size for one round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    cells: Array2<Cell>,
}

impl Grid {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            cells: Array2::default(difficulty.size().to_nd_index()),
        }
    }

    /// Builds a grid with mines at `mine_coords` and neighbor counts filled in.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::InvalidDimensions);
        }
        let mut grid = Self {
            cells: Array2::default(size.to_nd_index()),
        };
        for &coords in mine_coords {
            let coords = grid.validate_coords(coords)?;
            grid[coords].is_mine = true;
        }
        grid.compute_neighbor_counts();
        Ok(grid)
    }

    pub fn dimensions(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        // dimensions always come from a Coord2
        (rows as Coord, cols as Coord)
    }

    pub fn total_cells(&self) -> CellCount {
        let (rows, cols) = self.dimensions();
        mult(rows, cols)
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        let (rows, cols) = self.dimensions();
        coords.0 < rows && coords.1 < cols
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.contains(coords) {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds(coords))
        }
    }

    pub fn get(&self, coords: Coord2) -> Result<&Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(&self.cells[coords.to_nd_index()])
    }

    pub(crate) fn get_mut(&mut self, coords: Coord2) -> Result<&mut Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(&mut self.cells[coords.to_nd_index()])
    }

    /// Iterates all cells in row-major order with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (Coord2, &Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), cell)| ((row as Coord, col as Coord), cell))
    }

    pub fn for_each(&self, mut visitor: impl FnMut(Coord2, &Cell)) {
        for (coords, cell) in self.iter() {
            visitor(coords, cell);
        }
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.dimensions())
    }

    pub fn mine_count(&self) -> CellCount {
        self.count_where(|cell| cell.is_mine)
    }

    pub fn revealed_safe_count(&self) -> CellCount {
        self.count_where(Cell::is_revealed_safe)
    }

    /// Unrevealed cells that are not mines.
    pub fn cells_left(&self) -> CellCount {
        self.count_where(|cell| !cell.is_revealed && !cell.is_mine)
    }

    pub fn flagged_count(&self) -> CellCount {
        self.count_where(|cell| cell.is_flagged)
    }

    /// Every non-mine cell has been revealed, flags do not matter.
    pub fn all_safe_revealed(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_mine || cell.is_revealed)
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        // at most 8 neighbors
        self.iter_neighbors(coords)
            .filter(|&pos| self[pos].is_mine)
            .count() as u8
    }

    pub(crate) fn compute_neighbor_counts(&mut self) {
        let (rows, cols) = self.dimensions();
        for row in 0..rows {
            for col in 0..cols {
                let coords = (row, col);
                if !self[coords].is_mine {
                    self[coords].neighbor_mines = self.adjacent_mine_count(coords);
                }
            }
        }
    }

    fn count_where(&self, predicate: impl Fn(&Cell) -> bool) -> CellCount {
        // a board never exceeds Coord::MAX * Coord::MAX cells
        self.cells.iter().filter(|&cell| predicate(cell)).count() as CellCount
    }
}

impl Index<Coord2> for Grid {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl IndexMut<Coord2> for Grid {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.cells[coords.to_nd_index()]
    }
}
