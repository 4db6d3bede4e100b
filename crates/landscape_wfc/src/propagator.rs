//! Constraint propagation for a single cell.
//!
//! A cell's possibilities are narrowed by every collapsed neighbor: the
//! neighbor, looking back toward the cell, says which tiles it will accept.
//! Only the target cell is written.

use crate::grid::{CellState, Coord, Grid};
use crate::rules::AdjacencyRules;
use crate::tile::Possibilities;

/// Possibilities left at `at` after applying every collapsed neighbor's rules.
///
/// Pure read; see `update_constraints` for the mutating form.
pub fn constrained_possibilities(grid: &Grid, rules: &AdjacencyRules, at: Coord) -> Possibilities {
    let mut allowed = grid.cell(at).possibilities();

    for (d, n) in grid.neighbors(at) {
        if let CellState::Collapsed(neighbor_tile) = *grid.cell(n) {
            // From the neighbor's side, we lie in the opposite direction
            allowed = allowed.intersect(rules.allowed(neighbor_tile, d.opposite()));
        }
    }

    allowed
}

/// Recompute the possibilities at `at` and store them.
///
/// Returns the new set. An empty result is a contradiction; the caller must
/// treat it as terminal. Collapsed cells are returned unchanged.
pub fn update_constraints(grid: &mut Grid, rules: &AdjacencyRules, at: Coord) -> Possibilities {
    if let CellState::Collapsed(tile) = *grid.cell(at) {
        return Possibilities::single(tile);
    }

    let allowed = constrained_possibilities(grid, rules, at);
    grid.set_possibilities(at, allowed);
    allowed
}
