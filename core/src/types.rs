use core::slice;
use ndarray::Array2;

/// Single coordinate axis used for grid width, height, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

/// Number of cells on a board of `size`, saturating at `CellCount::MAX`.
pub const fn cell_count(size: Coord2) -> CellCount {
    (size.0 as CellCount).saturating_mul(size.1 as CellCount)
}

/// Width and height of a board stored as an `Array2`, clamped to the coordinate range.
pub fn board_size<T>(board: &Array2<T>) -> Coord2 {
    let (width, height) = board.dim();
    (
        width.try_into().unwrap_or(Coord::MAX),
        height.try_into().unwrap_or(Coord::MAX),
    )
}

/// Every position on a board of `size`, column by column.
pub fn board_coords(size: Coord2) -> impl Iterator<Item = Coord2> {
    let (width, height) = size;
    (0..width).flat_map(move |x| (0..height).map(move |y| (x, y)))
}

/// Squared euclidean distance between two cells.
pub(crate) fn distance_sq(a: Coord2, b: Coord2) -> u32 {
    let dx = u32::from(a.0.abs_diff(b.0));
    let dy = u32::from(a.1.abs_diff(b.1));
    dx * dx + dy * dy
}

/// Whether `coords` lies within `radius + 0.5` of `center`, without a square root.
pub(crate) fn within_radius(center: Coord2, coords: Coord2, radius: u8) -> bool {
    let span = 2 * u32::from(radius) + 1;
    4 * distance_sq(center, coords) <= span * span
}

static RING: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

fn step(coords: Coord2, (dx, dy): (i8, i8), size: Coord2) -> Option<Coord2> {
    let x = coords.0.checked_add_signed(dx).filter(|&x| x < size.0)?;
    let y = coords.1.checked_add_signed(dy).filter(|&y| y < size.1)?;
    Some((x, y))
}

/// The up-to-eight cells touching `center`, clipped at the board edges.
#[derive(Clone, Debug)]
pub struct Neighbors {
    center: Coord2,
    size: Coord2,
    ring: slice::Iter<'static, (i8, i8)>,
}

impl Neighbors {
    pub fn around(center: Coord2, size: Coord2) -> Self {
        Self {
            center,
            size,
            ring: RING.iter(),
        }
    }
}

impl Iterator for Neighbors {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        let (center, size) = (self.center, self.size);
        self.ring.find_map(|&delta| step(center, delta, size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn neighbors_are_clipped_at_corners_and_edges() {
        assert_eq!(Neighbors::around((0, 0), (5, 5)).count(), 3);
        assert_eq!(Neighbors::around((2, 0), (5, 5)).count(), 5);
        assert_eq!(Neighbors::around((2, 2), (5, 5)).count(), 8);
        assert_eq!(Neighbors::around((4, 4), (5, 5)).count(), 3);
    }

    #[test]
    fn neighbors_of_single_cell_board_are_empty() {
        let neighbors: Vec<_> = Neighbors::around((0, 0), (1, 1)).collect();
        assert!(neighbors.is_empty());
    }

    #[test]
    fn board_coords_cover_the_board_column_by_column() {
        let coords: Vec<_> = board_coords((2, 2)).collect();
        assert_eq!(coords, [(0, 0), (0, 1), (1, 0), (1, 1)]);
        assert_eq!(board_coords((0, 4)).count(), 0);
        assert_eq!(cell_count((200, 200)), 40_000);
        assert_eq!(cell_count((255, 255)), 65_025);
    }

    #[test]
    fn radius_includes_half_cell_margin() {
        // radius 1 covers the full 3x3 block: diagonal distance is ~1.41 <= 1.5
        assert!(within_radius((5, 5), (6, 6), 1));
        assert!(!within_radius((5, 5), (7, 5), 1));
        // radius 2: (2, 1) is ~2.24 <= 2.5, (2, 2) is ~2.83 > 2.5
        assert!(within_radius((5, 5), (7, 6), 2));
        assert!(!within_radius((5, 5), (7, 7), 2));
        assert!(within_radius((5, 5), (5, 5), 0));
        assert!(!within_radius((5, 5), (5, 6), 0));
    }
}
