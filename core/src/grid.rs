use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// The `width × height` cell array with its aggregate counters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    cells: Array2<Cell>,
    mine_count: CellCount,
    flag_count: CellCount,
    revealed_count: CellCount,
    inactive_count: CellCount,
}

impl Grid {
    pub fn new(size: Coord2) -> Self {
        Self {
            cells: Array2::default(size.to_nd_index()),
            mine_count: 0,
            flag_count: 0,
            revealed_count: 0,
            inactive_count: 0,
        }
    }

    pub fn size(&self) -> Coord2 {
        board_size(&self.cells)
    }

    pub fn width(&self) -> Coord {
        self.size().0
    }

    pub fn height(&self) -> Coord {
        self.size().1
    }

    pub fn total_cells(&self) -> CellCount {
        cell_count(self.size())
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn flag_count(&self) -> CellCount {
        self.flag_count
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn inactive_count(&self) -> CellCount {
        self.inactive_count
    }

    pub fn in_bounds(&self, coords: Coord2) -> bool {
        let size = self.size();
        coords.0 < size.0 && coords.1 < size.1
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.in_bounds(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn cell(&self, coords: Coord2) -> Result<&Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(&self.cells[coords.to_nd_index()])
    }

    /// Marks a cell as a wall (`active == false`) or clears it, keeping `inactive_count` exact.
    pub fn set_active(&mut self, coords: Coord2, active: bool) -> Result<()> {
        let coords = self.validate_coords(coords)?;
        let cell = &mut self.cells[coords.to_nd_index()];
        if cell.active != active {
            cell.active = active;
            if active {
                self.inactive_count -= 1;
            } else {
                self.inactive_count += 1;
            }
        }
        Ok(())
    }

    /// Iterates every coordinate in column-major `(x, y)` order.
    pub fn coords(&self) -> impl Iterator<Item = Coord2> + use<> {
        board_coords(self.size())
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> Neighbors {
        Neighbors::around(coords, self.size())
    }

    pub fn mine_coords(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.coords().filter(|&coords| self[coords].has_mine)
    }

    pub(crate) fn cell_mut(&mut self, coords: Coord2) -> &mut Cell {
        &mut self.cells[coords.to_nd_index()]
    }

    /// Places or removes a mine. Mines are kept dark regardless of earlier light.
    pub(crate) fn set_mine(&mut self, coords: Coord2, has_mine: bool) {
        let cell = &mut self.cells[coords.to_nd_index()];
        if has_mine {
            cell.set_light(0.0);
        }
        if cell.has_mine == has_mine {
            return;
        }
        cell.has_mine = has_mine;
        if has_mine {
            self.mine_count += 1;
        } else {
            self.mine_count -= 1;
        }
    }

    pub(crate) fn clear_mines(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.has_mine = false;
            cell.adjacent_mines = 0;
        }
        self.mine_count = 0;
    }

    /// Sets `revealed`, returning whether the cell changed.
    pub(crate) fn mark_revealed(&mut self, coords: Coord2) -> bool {
        let cell = &mut self.cells[coords.to_nd_index()];
        if cell.revealed {
            return false;
        }
        cell.revealed = true;
        self.revealed_count += 1;
        true
    }

    pub(crate) fn set_flagged(&mut self, coords: Coord2, flagged: bool) {
        let cell = &mut self.cells[coords.to_nd_index()];
        if cell.flagged == flagged {
            return;
        }
        cell.flagged = flagged;
        if flagged {
            self.flag_count += 1;
        } else {
            self.flag_count -= 1;
        }
    }
}

impl Index<Coord2> for Grid {
    type Output = Cell;

    fn index(&self, (x, y): Coord2) -> &Self::Output {
        &self.cells[(x as usize, y as usize)]
    }
}
