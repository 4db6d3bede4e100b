//! FIFO work-list of cells awaiting constraint re-evaluation.
//!
//! Entries are not deduplicated. Processing a cell twice is harmless because
//! propagation recomputes from the current neighbor state.

use crate::grid::{Coord, Grid};
use std::collections::VecDeque;

#[derive(Debug, Clone, Default)]
pub struct PropagationQueue {
    pending: VecDeque<Coord>,
}

impl PropagationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the in-bounds, uncollapsed neighbors of `at`.
    ///
    /// Returns how many coordinates were queued.
    pub fn enqueue_neighbors(&mut self, grid: &Grid, at: Coord) -> usize {
        let before = self.pending.len();
        for (_, n) in grid.neighbors(at) {
            if !grid.cell(n).is_collapsed() {
                self.pending.push_back(n);
            }
        }
        self.pending.len() - before
    }

    /// Pop the oldest entry.
    pub fn dequeue(&mut self) -> Option<Coord> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
