//! Random number generator abstraction for the solver.
//!
//! The solver only needs "pick one element uniformly" and the decoration pass
//! only needs Bernoulli trials, so the trait is small and object-safe:
//!
//! - `StdRandom`: seeded `rand::rngs::StdRng` (normal use)
//! - `SequenceRandom`: replays a scripted sequence of draws (tests, replays)
//!
//! # Example
//!
//! ```ignore
//! use landscape_wfc::rng::{StdRandom, WfcRng};
//!
//! let mut rng = StdRandom::from_u64_seed(42);
//! let tile = rng.choose_uniform(alphabet.all());
//! let hit = rng.chance(0.3);
//! ```

use crate::tile::{Possibilities, TileId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of randomness injected into a solver run.
pub trait WfcRng {
    /// Returns a random double in [0.0, 1.0).
    fn next_double(&mut self) -> f64;

    /// Returns a random usize in [0, max). Returns 0 when `max` is 0.
    fn next_usize_max(&mut self, max: usize) -> usize;

    /// Returns a random u64.
    /// Used for deriving per-attempt seeds.
    fn next_u64(&mut self) -> u64;

    /// Pick one tile uniformly from a non-empty set.
    ///
    /// Returns `None` for the empty set without consuming a draw.
    fn choose_uniform(&mut self, set: Possibilities) -> Option<TileId> {
        if set.is_empty() {
            return None;
        }
        let index = self.next_usize_max(set.len());
        set.nth(index)
    }

    /// Bernoulli trial: true with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_double() < p
    }
}

/// Standard Rust RNG wrapper using `rand::rngs::StdRng`.
#[derive(Debug, Clone)]
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    /// Create from a u64 seed. Identical seeds give identical sequences.
    pub fn from_u64_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl WfcRng for StdRandom {
    fn next_double(&mut self) -> f64 {
        self.rng.gen()
    }

    fn next_usize_max(&mut self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        self.rng.gen_range(0..max)
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.gen()
    }
}

/// Replays a fixed script of draws.
///
/// Integer draws come from `indices` (reduced modulo the requested bound),
/// doubles from `doubles`. Both sequences cycle; an empty sequence yields 0.
#[derive(Debug, Clone, Default)]
pub struct SequenceRandom {
    indices: Vec<usize>,
    doubles: Vec<f64>,
    next_index: usize,
    next_double: usize,
}

impl SequenceRandom {
    /// Script of integer draws.
    pub fn new(indices: Vec<usize>) -> Self {
        Self {
            indices,
            ..Self::default()
        }
    }

    /// Add a script of double draws.
    pub fn with_doubles(mut self, doubles: Vec<f64>) -> Self {
        self.doubles = doubles;
        self
    }

    /// Number of integer draws consumed so far.
    pub fn index_draws(&self) -> usize {
        self.next_index
    }

    fn next_raw(&mut self) -> usize {
        if self.indices.is_empty() {
            return 0;
        }
        let value = self.indices[self.next_index % self.indices.len()];
        self.next_index += 1;
        value
    }
}

impl WfcRng for SequenceRandom {
    fn next_double(&mut self) -> f64 {
        if self.doubles.is_empty() {
            return 0.0;
        }
        let value = self.doubles[self.next_double % self.doubles.len()];
        self.next_double += 1;
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }

    fn next_usize_max(&mut self, max: usize) -> usize {
        let raw = self.next_raw();
        if max == 0 {
            0
        } else {
            raw % max
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.next_raw() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(i: usize) -> TileId {
        TileId::new(i).unwrap()
    }

    #[test]
    fn test_std_random_basic() {
        let mut rng = StdRandom::from_u64_seed(42);

        for _ in 0..100 {
            let v = rng.next_usize_max(7);
            assert!(v < 7);
        }

        for _ in 0..100 {
            let v = rng.next_double();
            assert!((0.0..1.0).contains(&v));
        }

        assert_eq!(rng.next_usize_max(0), 0);
    }

    #[test]
    fn test_std_random_is_deterministic() {
        let mut rng1 = StdRandom::from_u64_seed(123);
        let mut rng2 = StdRandom::from_u64_seed(123);
        for _ in 0..100 {
            assert_eq!(rng1.next_u64(), rng2.next_u64());
        }
    }

    #[test]
    fn test_choose_uniform_stays_in_set() {
        let mut rng = StdRandom::from_u64_seed(7);
        let set = Possibilities::from_tiles([t(1), t(4), t(6)]);
        let mut seen = [false; 8];
        for _ in 0..200 {
            let tile = rng.choose_uniform(set).unwrap();
            assert!(set.contains(tile));
            seen[tile.index()] = true;
        }
        assert!(seen[1] && seen[4] && seen[6], "all members should be drawn");
    }

    #[test]
    fn test_choose_uniform_empty_set() {
        let mut rng = SequenceRandom::new(vec![1]);
        assert_eq!(rng.choose_uniform(Possibilities::EMPTY), None);
        assert_eq!(rng.index_draws(), 0);
    }

    #[test]
    fn test_sequence_random_replays_script() {
        let mut rng = SequenceRandom::new(vec![0, 3, 5]);
        let set = Possibilities::from_tiles([t(2), t(3)]);
        assert_eq!(rng.choose_uniform(set), Some(t(2)));
        assert_eq!(rng.choose_uniform(set), Some(t(3)));
        assert_eq!(rng.choose_uniform(set), Some(t(3)));
        // Cycles back to the start
        assert_eq!(rng.choose_uniform(set), Some(t(2)));
        assert_eq!(rng.index_draws(), 4);
    }

    #[test]
    fn test_sequence_random_chance() {
        let mut rng = SequenceRandom::default().with_doubles(vec![0.05, 0.5]);
        assert!(rng.chance(0.1));
        assert!(!rng.chance(0.1));
        // No doubles scripted: every trial with p > 0 succeeds
        let mut empty = SequenceRandom::default();
        assert!(empty.chance(0.01));
        assert!(!empty.chance(0.0));
    }
}
