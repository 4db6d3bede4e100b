//! Lowest-entropy cell selection.

use crate::grid::{CellState, Coord, Grid};

/// Find the uncollapsed cell with the fewest remaining possibilities.
///
/// Cells are scanned in row-major order and only a strictly smaller entropy
/// replaces the current pick, so ties go to the first cell scanned. Returns
/// `None` when every cell is collapsed.
pub fn find_lowest_entropy_cell(grid: &Grid) -> Option<Coord> {
    let mut best: Option<(Coord, usize)> = None;

    for (at, cell) in grid.iter() {
        let CellState::Uncollapsed(set) = cell else {
            continue;
        };
        let entropy = set.len();
        if best.map_or(true, |(_, min)| entropy < min) {
            best = Some((at, entropy));
        }
    }

    best.map(|(at, _)| at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::{Possibilities, TileId};

    fn t(i: usize) -> TileId {
        TileId::new(i).unwrap()
    }

    #[test]
    fn test_all_collapsed_returns_none() {
        let mut grid = Grid::new(2, 1, Possibilities::full(2));
        grid.collapse(Coord::new(0, 0), t(0));
        grid.collapse(Coord::new(1, 0), t(1));
        assert_eq!(find_lowest_entropy_cell(&grid), None);
    }

    #[test]
    fn test_tie_goes_to_first_in_row_major_order() {
        let grid = Grid::new(3, 3, Possibilities::full(4));
        assert_eq!(find_lowest_entropy_cell(&grid), Some(Coord::new(0, 0)));
    }

    #[test]
    fn test_picks_strictly_lowest() {
        let mut grid = Grid::new(3, 3, Possibilities::full(4));
        grid.collapse(Coord::new(0, 0), t(0));
        grid.set_possibilities(Coord::new(2, 1), Possibilities::from_tiles([t(0), t(1)]));
        grid.set_possibilities(Coord::new(0, 2), Possibilities::from_tiles([t(2), t(3)]));
        grid.set_possibilities(Coord::new(1, 2), Possibilities::from_tiles([t(1), t(2), t(3)]));

        assert_eq!(find_lowest_entropy_cell(&grid), Some(Coord::new(2, 1)));
    }

    #[test]
    fn test_collapsed_cells_are_ignored() {
        let mut grid = Grid::new(2, 1, Possibilities::full(3));
        grid.collapse(Coord::new(0, 0), t(1));
        assert_eq!(find_lowest_entropy_cell(&grid), Some(Coord::new(1, 0)));
    }
}
