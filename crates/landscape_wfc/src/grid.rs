//! Cell store for one generation run.
//!
//! Each cell is either still uncertain (a possibility set) or collapsed to a
//! single tile. Keeping the collapsed tile in its own variant means a
//! collapsed cell cannot hold anything but exactly one tile.
//!
//! Cells are stored flat in row-major order: index = x + y * width.

use crate::direction::Direction;
use crate::error::GridError;
use crate::rules::AdjacencyRules;
use crate::tile::{Possibilities, TileId};
use serde::{Deserialize, Serialize};

/// A grid position. `(0, 0)` is the top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// State of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    /// Tiles still consistent with the collapsed neighbors seen so far.
    /// An empty set is a contradiction.
    Uncollapsed(Possibilities),
    /// Final tile.
    Collapsed(TileId),
}

impl CellState {
    /// Current possibility set (a singleton for collapsed cells).
    pub fn possibilities(&self) -> Possibilities {
        match *self {
            CellState::Uncollapsed(set) => set,
            CellState::Collapsed(tile) => Possibilities::single(tile),
        }
    }

    pub fn is_collapsed(&self) -> bool {
        matches!(self, CellState::Collapsed(_))
    }

    /// The resolved tile, if collapsed.
    pub fn tile(&self) -> Option<TileId> {
        match *self {
            CellState::Collapsed(tile) => Some(tile),
            CellState::Uncollapsed(_) => None,
        }
    }

    /// Number of remaining possibilities.
    pub fn entropy(&self) -> usize {
        self.possibilities().len()
    }
}

/// Fixed-size 2D matrix of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<CellState>,
}

impl Grid {
    /// Create a grid where every cell may be any tile of `initial`.
    ///
    /// A single-tile `initial` leaves nothing to decide, so every cell starts
    /// collapsed. Callers must check the size with `cell_count` first.
    pub fn new(width: usize, height: usize, initial: Possibilities) -> Self {
        let cell = match initial.single_tile() {
            Some(tile) => CellState::Collapsed(tile),
            None => CellState::Uncollapsed(initial),
        };
        Self {
            width,
            height,
            cells: vec![cell; width * height],
        }
    }

    /// Number of cells for `width x height`, or `None` if the product
    /// overflows or could not be allocated.
    pub fn cell_count(width: usize, height: usize) -> Option<usize> {
        let count = width.checked_mul(height)?;
        let bytes = count.checked_mul(std::mem::size_of::<CellState>())?;
        (bytes <= isize::MAX as usize).then_some(count)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn in_bounds(&self, at: Coord) -> bool {
        at.x < self.width && at.y < self.height
    }

    /// Fail with `OutOfBounds` unless `at` lies in the grid.
    pub fn check(&self, at: Coord) -> Result<Coord, GridError> {
        if self.in_bounds(at) {
            Ok(at)
        } else {
            Err(GridError::OutOfBounds {
                x: at.x,
                y: at.y,
                width: self.width,
                height: self.height,
            })
        }
    }

    #[inline]
    fn index(&self, at: Coord) -> usize {
        at.x + at.y * self.width
    }

    /// Cell state at `at`.
    pub fn get(&self, at: Coord) -> Result<&CellState, GridError> {
        let at = self.check(at)?;
        Ok(&self.cells[self.index(at)])
    }

    /// Cell state at a coordinate already known to be in bounds.
    #[inline]
    pub(crate) fn cell(&self, at: Coord) -> &CellState {
        &self.cells[self.index(at)]
    }

    /// Replace the possibility set of an uncollapsed cell.
    ///
    /// Collapsed cells are left untouched.
    pub(crate) fn set_possibilities(&mut self, at: Coord, set: Possibilities) {
        let index = self.index(at);
        if let CellState::Uncollapsed(current) = &mut self.cells[index] {
            *current = set;
        }
    }

    /// Finalize a cell to a single tile.
    pub(crate) fn collapse(&mut self, at: Coord, tile: TileId) {
        let index = self.index(at);
        self.cells[index] = CellState::Collapsed(tile);
    }

    /// The in-bounds neighbor of `at` in `direction`, if any.
    pub fn neighbor(&self, at: Coord, direction: Direction) -> Option<Coord> {
        let (dx, dy) = direction.offset();
        let x = at.x.checked_add_signed(dx)?;
        let y = at.y.checked_add_signed(dy)?;
        let n = Coord::new(x, y);
        self.in_bounds(n).then_some(n)
    }

    /// In-bounds neighbors of `at`, paired with the direction leading to them.
    pub fn neighbors(&self, at: Coord) -> impl Iterator<Item = (Direction, Coord)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |d| self.neighbor(at, d).map(|n| (d, n)))
    }

    /// All cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &CellState)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (Coord::new(i % width, i / width), cell))
    }

    /// True once every cell holds a final tile.
    pub fn is_fully_collapsed(&self) -> bool {
        self.cells.iter().all(CellState::is_collapsed)
    }

    /// Number of collapsed cells.
    pub fn collapsed_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_collapsed()).count()
    }

    /// Resolved tiles in row-major order, or `None` if any cell is uncollapsed.
    pub fn tiles(&self) -> Option<Vec<TileId>> {
        self.cells.iter().map(CellState::tile).collect()
    }

    /// Adjacent collapsed pairs that break the rule table.
    ///
    /// Each entry is `(a, d, b)`: `b` lies in direction `d` from `a` and is
    /// not in `allowed(tile(a), d)`.
    pub fn violations(&self, rules: &AdjacencyRules) -> Vec<(Coord, Direction, Coord)> {
        let mut found = Vec::new();
        for (at, cell) in self.iter() {
            let Some(tile) = cell.tile() else { continue };
            for (d, n) in self.neighbors(at) {
                if let Some(other) = self.cell(n).tile() {
                    if !rules.permits(tile, d, other) {
                        found.push((at, d, n));
                    }
                }
            }
        }
        found
    }
}
