use super::*;

/// Copies a designer-authored mine map verbatim.
#[derive(Clone, Debug)]
pub struct LayoutMinePlacer<'a> {
    mine_map: &'a Array2<bool>,
}

impl<'a> LayoutMinePlacer<'a> {
    pub fn new(mine_map: &'a Array2<bool>) -> Self {
        Self { mine_map }
    }
}

impl MinePlacer for LayoutMinePlacer<'_> {
    fn place(self, grid: &mut Grid) -> Result<CellCount> {
        let size = grid.size();
        let expected = (usize::from(size.0), usize::from(size.1));
        if self.mine_map.dim() != expected {
            log::error!(
                "Mine layout shape {:?} does not match grid size {:?}",
                self.mine_map.dim(),
                expected
            );
            return Err(GameError::InvalidBoardShape);
        }

        grid.clear_mines();
        for coords in grid.coords() {
            if self.mine_map[coords.to_nd_index()] {
                grid.set_mine(coords, true);
            }
        }
        Ok(grid.mine_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copies_mine_map() {
        let mut map = Array2::from_elem([5, 5], false);
        for coords in [(2, 4), (1, 2), (3, 1)] {
            map[coords.to_nd_index()] = true;
        }
        let mut grid = Grid::new((5, 5));

        let placed = place_mines_from_layout(&mut grid, &map).unwrap();

        assert_eq!(placed, 3);
        assert!(grid[(1, 2)].has_mine());
        assert!(!grid[(0, 0)].has_mine());
    }

    #[test]
    fn rejects_dimension_mismatch_without_mutation() {
        let mut map = Array2::from_elem([4, 5], false);
        map[[0, 0]] = true;
        let mut grid = Grid::new((5, 5));

        assert_eq!(
            place_mines_from_layout(&mut grid, &map),
            Err(GameError::InvalidBoardShape)
        );
        assert_eq!(grid.mine_count(), 0);
    }
}
