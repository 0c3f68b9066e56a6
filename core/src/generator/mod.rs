use ndarray::Array2;
use rand::Rng;

use crate::*;
pub use layout::*;
pub use random::*;

mod layout;
mod random;

/// Strategy that decides which cells of a fresh grid hold mines.
///
/// Placers only set `has_mine`; adjacency is recomputed separately with [`Grid::compute_adjacency`].
pub trait MinePlacer {
    /// Places mines and returns how many were actually placed.
    fn place(self, grid: &mut Grid) -> Result<CellCount>;
}

/// Shuffles eligible cells and mines the first `count`, keeping `safe` and its neighbors clear.
pub fn place_mines_random<R: Rng + ?Sized>(
    grid: &mut Grid,
    count: CellCount,
    safe: Coord2,
    rng: &mut R,
) -> Result<CellCount> {
    RandomMinePlacer::new(count, safe, rng).place(grid)
}

/// Copies a boolean mine map onto the grid; the map must match the grid size.
pub fn place_mines_from_layout(grid: &mut Grid, mine_map: &Array2<bool>) -> Result<CellCount> {
    LayoutMinePlacer::new(mine_map).place(grid)
}
