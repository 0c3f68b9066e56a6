use alloc::vec::Vec;
use rand::seq::SliceRandom;

use super::*;

/// Purely random placement that keeps the first-click cell and its eight neighbors mine free.
#[derive(Debug)]
pub struct RandomMinePlacer<'r, R: Rng + ?Sized> {
    count: CellCount,
    safe: Coord2,
    rng: &'r mut R,
}

impl<'r, R: Rng + ?Sized> RandomMinePlacer<'r, R> {
    pub fn new(count: CellCount, safe: Coord2, rng: &'r mut R) -> Self {
        Self { count, safe, rng }
    }
}

impl<R: Rng + ?Sized> MinePlacer for RandomMinePlacer<'_, R> {
    fn place(self, grid: &mut Grid) -> Result<CellCount> {
        let safe = grid.validate_coords(self.safe)?;
        let safe_zone: Vec<Coord2> = core::iter::once(safe)
            .chain(grid.iter_neighbors(safe))
            .collect();

        let mut eligible: Vec<Coord2> = grid
            .coords()
            .filter(|coords| !safe_zone.contains(coords))
            .filter(|&coords| grid[coords].is_active())
            .collect();

        let requested = usize::from(self.count);
        if requested > eligible.len() {
            log::warn!(
                "Not enough room for mines, requested {} but only {} cells are eligible",
                requested,
                eligible.len()
            );
        }

        eligible.shuffle(self.rng);

        grid.clear_mines();
        for &coords in eligible.iter().take(requested) {
            grid.set_mine(coords, true);
        }

        log::debug!(
            "Placed {} mines around safe cell {:?}",
            grid.mine_count(),
            safe
        );
        Ok(grid.mine_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn keeps_safe_zone_clear() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut grid = Grid::new((6, 6));

        let placed = place_mines_random(&mut grid, 20, (2, 2), &mut rng).unwrap();

        assert_eq!(placed, 20);
        assert_eq!(grid.mine_count(), 20);
        for x in 1..=3 {
            for y in 1..=3 {
                assert!(!grid[(x, y)].has_mine(), "mine in safe zone at {:?}", (x, y));
            }
        }
    }

    #[test]
    fn clamps_when_safe_zone_covers_grid() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut grid = Grid::new((3, 3));

        let placed = place_mines_random(&mut grid, 8, (1, 1), &mut rng).unwrap();

        assert_eq!(placed, 0);
        assert_eq!(grid.mine_count(), 0);
    }

    #[test]
    fn clamps_to_eligible_cells() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut grid = Grid::new((4, 4));

        // corner safe zone removes 4 cells, leaving 12
        let placed = place_mines_random(&mut grid, 100, (0, 0), &mut rng).unwrap();

        assert_eq!(placed, 12);
        assert_eq!(grid.mine_coords().count(), 12);
    }

    #[test]
    fn skips_inactive_cells() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut grid = Grid::new((5, 1));
        grid.set_active((4, 0), false).unwrap();

        let placed = place_mines_random(&mut grid, 5, (0, 0), &mut rng).unwrap();

        assert_eq!(placed, 2);
        assert!(grid[(2, 0)].has_mine());
        assert!(grid[(3, 0)].has_mine());
        assert!(!grid[(4, 0)].has_mine());
    }

    #[test]
    fn same_seed_places_same_mines() {
        let place = |seed| {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut grid = Grid::new((8, 8));
            place_mines_random(&mut grid, 10, (4, 4), &mut rng).unwrap();
            grid.mine_coords().collect::<Vec<_>>()
        };

        assert_eq!(place(42), place(42));
    }

    #[test]
    fn rejects_safe_cell_out_of_bounds() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut grid = Grid::new((3, 3));

        assert_eq!(
            place_mines_random(&mut grid, 1, (3, 3), &mut rng),
            Err(GameError::InvalidCoords)
        );
    }
}
