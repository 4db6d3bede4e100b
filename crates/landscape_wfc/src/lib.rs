//! Wave Function Collapse for 2D tile grids.
//!
//! This crate provides:
//! - `TileAlphabet` / `Possibilities`: tile names and bitset candidate sets
//! - `AdjacencyRules`: per-direction neighbor tables
//! - `Grid`: row-major cell storage with bounds-checked access
//! - `WfcSolver`: step-at-a-time collapse engine with injectable randomness
//! - `generate`: retry loop that starts fresh runs on contradiction
//! - `decorate`: probabilistic markers over a finished grid
//! - Tileset/generator configuration and grid save/load
//!
//! ## Example
//!
//! ```ignore
//! use landscape_wfc::{SolverConfig, StdRandom, StepResult, TilesetConfig, WfcSolver};
//!
//! let tileset = TilesetConfig::landscape().build()?;
//! let mut solver = WfcSolver::new(
//!     tileset.rules.clone(),
//!     SolverConfig::new(20, 15),
//!     Box::new(StdRandom::from_u64_seed(42)),
//! )?;
//!
//! while solver.step() == StepResult::Continuing {}
//! ```

pub mod config;
pub mod decoration;
pub mod direction;
pub mod entropy;
pub mod error;
pub mod grid;
pub mod grid_io;
pub mod propagator;
pub mod queue;
pub mod rng;
pub mod rules;
pub mod runner;
pub mod solver;
pub mod tile;
pub mod tileset;

pub use config::{load_config, GeneratorConfig};
pub use decoration::{decorate, Decoration, DecorationRule};
pub use direction::Direction;
pub use entropy::find_lowest_entropy_cell;
pub use error::{ConfigError, GridError};
pub use grid::{CellState, Coord, Grid};
pub use grid_io::{
    load_grid, load_grid_as, save_grid, save_grid_as, GridFormat, GridIoError, GridIoResult,
    GridSnapshot,
};
pub use propagator::{constrained_possibilities, update_constraints};
pub use queue::PropagationQueue;
pub use rng::{SequenceRandom, StdRandom, WfcRng};
pub use rules::{AdjacencyRules, NamedRules};
pub use runner::{generate, run_to_end, GenerateError, Generated, RunOutcome};
pub use solver::{
    Contradiction, ContradictionSource, SolverConfig, SolverState, StepEvent, StepResult,
    WfcSolver,
};
pub use tile::{Possibilities, TileAlphabet, TileId, MAX_TILES};
pub use tileset::{DecorationConfig, Tileset, TilesetConfig};
