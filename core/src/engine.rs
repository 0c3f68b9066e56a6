use alloc::collections::VecDeque;
use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Outcome of revealing a single cell without flooding.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealOutcome {
    Safe,
    Mine,
    AlreadyRevealed,
    Flagged,
    Inactive,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Safe)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlagOutcome {
    NoChange,
    Flagged,
    Unflagged,
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

impl Grid {
    /// Recounts `adjacent_mines` for every cell from the current mine placement.
    pub fn compute_adjacency(&mut self) {
        let coords: Vec<Coord2> = self.coords().collect();
        for coords in coords {
            let count = self
                .iter_neighbors(coords)
                .filter(|&pos| self[pos].has_mine)
                .count();
            self.cell_mut(coords).adjacent_mines = count as u8;
        }
    }

    /// Reveals exactly one cell. Mine hits are reported, never acted upon.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let cell = *self.cell(coords)?;

        Ok(if !cell.active {
            RevealOutcome::Inactive
        } else if cell.flagged {
            RevealOutcome::Flagged
        } else if cell.revealed {
            RevealOutcome::AlreadyRevealed
        } else if cell.has_mine {
            RevealOutcome::Mine
        } else {
            self.mark_revealed(coords);
            RevealOutcome::Safe
        })
    }

    /// Lights and reveals outward from `start` in one breadth-first pass.
    ///
    /// Mines are skipped entirely, walls and flags are lit but stop the flood, and every
    /// numbered cell is a hard boundary whether or not it was revealed before. Returns the
    /// cells whose light changed, in visiting order.
    pub fn discover(&mut self, start: Coord2, max_radius: u8) -> Result<Vec<Coord2>> {
        let start = self.validate_coords(start)?;
        Ok(self.illuminate(start, max_radius, true))
    }

    /// Light-only variant of [`Grid::discover`], used before any mine exists.
    pub fn expand_visibility(&mut self, center: Coord2, radius: u8) -> Result<Vec<Coord2>> {
        let center = self.validate_coords(center)?;
        Ok(self.illuminate(center, radius, false))
    }

    fn illuminate(&mut self, start: Coord2, max_radius: u8, reveal: bool) -> Vec<Coord2> {
        let mut changed = Vec::new();
        let mut visited: Array2<bool> = Array2::default(self.size().to_nd_index());
        let mut to_visit = VecDeque::from([start]);
        visited[start.to_nd_index()] = true;

        while let Some(coords) = to_visit.pop_front() {
            let cell = self[coords];

            if cell.has_mine {
                log::trace!("Skipping mine at {:?}", coords);
                continue;
            }

            if cell.light < 1.0 {
                self.cell_mut(coords).set_light(1.0);
                changed.push(coords);
            }

            if reveal && cell.active && !cell.flagged && !cell.revealed {
                self.mark_revealed(coords);
                log::trace!(
                    "Discovered cell at {:?}, mine count: {}",
                    coords,
                    cell.adjacent_mines
                );
            }

            if !cell.active || cell.flagged || cell.adjacent_mines > 0 {
                continue;
            }

            for neighbor in self.iter_neighbors(coords) {
                if visited[neighbor.to_nd_index()] || !within_radius(start, neighbor, max_radius) {
                    continue;
                }
                visited[neighbor.to_nd_index()] = true;
                to_visit.push_back(neighbor);
            }
        }

        log::debug!(
            "Illuminated from {:?} with radius {}, {} cells changed",
            start,
            max_radius,
            changed.len()
        );
        changed
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        let cell = *self.cell(coords)?;

        Ok(if cell.revealed {
            FlagOutcome::NoChange
        } else if cell.flagged {
            self.set_flagged(coords, false);
            FlagOutcome::Unflagged
        } else {
            self.set_flagged(coords, true);
            FlagOutcome::Flagged
        })
    }

    /// Whether every playable safe cell has been revealed. Walls are not playable.
    pub fn check_victory(&self) -> bool {
        let playable = self
            .total_cells()
            .saturating_sub(self.mine_count())
            .saturating_sub(self.inactive_count());
        self.revealed_count() >= playable
    }
}
