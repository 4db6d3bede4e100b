//! Decoration pass over a finished grid.
//!
//! Each collapsed cell whose tile has a rule gets one Bernoulli trial; a hit
//! emits a decoration marker at that coordinate. The grid is only read.

use crate::grid::{Coord, Grid};
use crate::rng::WfcRng;
use crate::tile::TileId;

/// Chance of placing `decoration` on cells holding `tile`.
#[derive(Debug, Clone, PartialEq)]
pub struct DecorationRule {
    pub tile: TileId,
    pub decoration: String,
    /// Probability in [0, 1].
    pub probability: f64,
}

impl DecorationRule {
    pub fn new(tile: TileId, decoration: impl Into<String>, probability: f64) -> Self {
        Self {
            tile,
            decoration: decoration.into(),
            probability: probability.clamp(0.0, 1.0),
        }
    }
}

/// A placed decoration marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    pub at: Coord,
    pub tile: TileId,
    pub decoration: String,
}

/// Roll decorations for every collapsed cell, in row-major order.
///
/// The first rule matching a cell's tile applies. Cells without a matching
/// rule, and uncollapsed cells, draw no randomness.
pub fn decorate(grid: &Grid, rules: &[DecorationRule], rng: &mut dyn WfcRng) -> Vec<Decoration> {
    let mut placed = Vec::new();

    for (at, cell) in grid.iter() {
        let Some(tile) = cell.tile() else { continue };
        let Some(rule) = rules.iter().find(|r| r.tile == tile) else {
            continue;
        };

        if rng.chance(rule.probability) {
            placed.push(Decoration {
                at,
                tile,
                decoration: rule.decoration.clone(),
            });
        }
    }

    placed
}
