use serde::{Deserialize, Serialize};

/// One grid square: the Minesweeper truth plus the perceptual light layer.
///
/// Fields are only mutated through [`crate::Grid`] so the grid-wide counters stay exact.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub(crate) has_mine: bool,
    pub(crate) adjacent_mines: u8,
    pub(crate) revealed: bool,
    pub(crate) flagged: bool,
    pub(crate) active: bool,
    pub(crate) light: f32,
}

impl Cell {
    pub const fn has_mine(&self) -> bool {
        self.has_mine
    }

    pub const fn adjacent_mines(&self) -> u8 {
        self.adjacent_mines
    }

    pub const fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub const fn is_flagged(&self) -> bool {
        self.flagged
    }

    /// Inactive cells are walls: they block interaction and propagation.
    pub const fn is_active(&self) -> bool {
        self.active
    }

    pub const fn light(&self) -> f32 {
        self.light
    }

    pub fn is_lit(&self) -> bool {
        self.light > 0.0
    }

    pub(crate) fn set_light(&mut self, light: f32) {
        self.light = light.clamp(0.0, 1.0);
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            has_mine: false,
            adjacent_mines: 0,
            revealed: false,
            flagged: false,
            active: true,
            light: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cell_is_active_dark_and_hidden() {
        let cell = Cell::default();
        assert!(cell.is_active());
        assert!(!cell.is_revealed());
        assert!(!cell.is_flagged());
        assert!(!cell.has_mine());
        assert_eq!(cell.light(), 0.0);
    }

    #[test]
    fn light_is_clamped() {
        let mut cell = Cell::default();
        cell.set_light(3.5);
        assert_eq!(cell.light(), 1.0);
        cell.set_light(-1.0);
        assert_eq!(cell.light(), 0.0);
    }
}
