//! Collapse engine: drives one generation run a step at a time.
//!
//! Each `step()` performs exactly one unit of work:
//! - queue non-empty: dequeue one cell and propagate into it, collapsing it
//!   if a single tile remains
//! - queue empty: pick the lowest-entropy cell, refresh it, and collapse it
//!   to a uniformly chosen remaining tile
//! - nothing left to collapse: report completion
//!
//! The first cell (grid centre unless configured) is collapsed during
//! construction to seed the propagation wave. There is no internal loop and
//! no retry; callers pace the run and decide what to do on contradiction.

use crate::entropy::find_lowest_entropy_cell;
use crate::error::{ConfigError, GridError};
use crate::grid::{Coord, Grid};
use crate::propagator::update_constraints;
use crate::queue::PropagationQueue;
use crate::rng::WfcRng;
use crate::rules::AdjacencyRules;
use crate::tile::{Possibilities, TileId};
use bevy_log::debug;

/// Construction parameters for a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    pub width: usize,
    pub height: usize,
    /// Cell collapsed before the first step. Defaults to the grid centre.
    pub start: Option<Coord>,
    /// Restrict the start cell to this tile instead of a random one.
    pub start_tile: Option<TileId>,
    /// Cells collapsed by the caller before the run begins.
    pub presets: Vec<(Coord, TileId)>,
}

impl SolverConfig {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            start: None,
            start_tile: None,
            presets: Vec::new(),
        }
    }

    pub fn with_start(mut self, start: Coord) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_start_tile(mut self, tile: TileId) -> Self {
        self.start_tile = Some(tile);
        self
    }

    pub fn with_preset(mut self, at: Coord, tile: TileId) -> Self {
        self.presets.push((at, tile));
        self
    }

    /// Start coordinate after applying the centre default.
    pub fn start_coord(&self) -> Coord {
        self.start
            .unwrap_or(Coord::new(self.width / 2, self.height / 2))
    }
}

/// Where the solver is in its state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverState {
    /// Propagation tasks are queued
    Propagating,
    /// Queue drained, uncollapsed cells remain
    Selecting,
    /// Every cell is collapsed
    Done,
    /// Some cell ran out of possibilities
    Contradiction,
}

/// Result of a single `step()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    Continuing,
    Completed,
    Contradiction,
}

/// The phase in which an empty possibility set was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContradictionSource {
    /// Cells fixed before the run (presets, or every cell of a one-tile
    /// alphabet) break the rule table
    Preset,
    /// The start cell had nothing left before the run began
    Seed,
    /// A queued cell was narrowed to nothing
    Propagation,
    /// The lowest-entropy cell had nothing left to choose from
    Selection,
}

/// Terminal failure of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contradiction {
    pub at: Coord,
    pub source: ContradictionSource,
}

/// What the last unit of work did, for consumers that update incrementally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    /// A dequeued cell was already collapsed
    Skipped { at: Coord },
    /// A queued cell lost possibilities but still has several
    Narrowed { at: Coord, remaining: usize },
    /// A cell was finalized. `chosen` is true when the tile was drawn at
    /// random rather than forced by propagation.
    Collapsed { at: Coord, tile: TileId, chosen: bool },
    /// No uncollapsed cells remain
    Completed,
    Contradiction(Contradiction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminal {
    Done,
    Failed(Contradiction),
}

/// One generation run: grid, propagation queue and randomness.
///
/// Build a new solver for every run; there is no in-place restart.
pub struct WfcSolver {
    rules: AdjacencyRules,
    grid: Grid,
    queue: PropagationQueue,
    rng: Box<dyn WfcRng>,
    terminal: Option<Terminal>,
    start: Coord,
    steps: usize,
    last_event: Option<StepEvent>,
}

impl WfcSolver {
    /// Validate the configuration, apply presets and collapse the start cell.
    ///
    /// Configuration problems are errors. A run that is already impossible
    /// (conflicting presets, or a start cell with no options) is returned in
    /// the `Contradiction` state so the first `step()` reports it.
    pub fn new(
        rules: AdjacencyRules,
        config: SolverConfig,
        rng: Box<dyn WfcRng>,
    ) -> Result<Self, ConfigError> {
        let tile_count = rules.tile_count();
        if tile_count == 0 {
            return Err(ConfigError::EmptyAlphabet);
        }
        if config.width == 0
            || config.height == 0
            || Grid::cell_count(config.width, config.height).is_none()
        {
            return Err(ConfigError::InvalidDimensions {
                width: config.width,
                height: config.height,
            });
        }

        let alphabet = Possibilities::full(tile_count);
        let grid = Grid::new(config.width, config.height, alphabet);

        let start = grid.check(config.start_coord())?;
        if let Some(tile) = config.start_tile {
            check_tile(alphabet, tile, "start tile")?;
        }
        for &(at, tile) in &config.presets {
            grid.check(at)?;
            check_tile(alphabet, tile, "preset")?;
        }

        let mut solver = Self {
            rules,
            grid,
            queue: PropagationQueue::new(),
            rng,
            terminal: None,
            start,
            steps: 0,
            last_event: None,
        };

        solver.apply_presets(&config.presets);
        if solver.terminal.is_none() {
            solver.seed_start(config.start_tile);
        }

        Ok(solver)
    }

    fn apply_presets(&mut self, presets: &[(Coord, TileId)]) {
        for &(at, tile) in presets {
            self.grid.collapse(at, tile);
        }

        if let Some(&(at, _, _)) = self.grid.violations(&self.rules).first() {
            self.fail(at, ContradictionSource::Preset);
            return;
        }

        for &(at, _) in presets {
            self.queue.enqueue_neighbors(&self.grid, at);
        }
    }

    /// Collapse the start cell to a random tile still allowed there.
    fn seed_start(&mut self, forced: Option<TileId>) {
        let at = self.start;
        if self.grid.cell(at).is_collapsed() {
            return;
        }

        let mut allowed = update_constraints(&mut self.grid, &self.rules, at);
        if let Some(tile) = forced {
            allowed = allowed.intersect(Possibilities::single(tile));
            self.grid.set_possibilities(at, allowed);
        }

        match self.rng.choose_uniform(allowed) {
            Some(tile) => {
                self.collapse(at, tile, true);
            }
            None => {
                self.fail(at, ContradictionSource::Seed);
            }
        }
    }

    /// Perform one unit of work.
    ///
    /// Once `Completed` or `Contradiction` has been returned, every later
    /// call returns the same value and changes nothing.
    pub fn step(&mut self) -> StepResult {
        match self.terminal {
            Some(Terminal::Done) => return StepResult::Completed,
            Some(Terminal::Failed(_)) => return StepResult::Contradiction,
            None => {}
        }

        self.steps += 1;

        match self.queue.dequeue() {
            Some(at) => self.process_task(at),
            None => self.select_and_collapse(),
        }
    }

    /// Propagate into one queued cell.
    fn process_task(&mut self, at: Coord) -> StepResult {
        if self.grid.cell(at).is_collapsed() {
            self.last_event = Some(StepEvent::Skipped { at });
            return StepResult::Continuing;
        }

        let allowed = update_constraints(&mut self.grid, &self.rules, at);
        if allowed.is_empty() {
            return self.fail(at, ContradictionSource::Propagation);
        }

        match allowed.single_tile() {
            Some(tile) => self.collapse(at, tile, false),
            None => {
                self.last_event = Some(StepEvent::Narrowed {
                    at,
                    remaining: allowed.len(),
                });
                StepResult::Continuing
            }
        }
    }

    /// Collapse the lowest-entropy cell, or finish if none remain.
    fn select_and_collapse(&mut self) -> StepResult {
        let Some(at) = find_lowest_entropy_cell(&self.grid) else {
            debug_assert!(self.grid.violations(&self.rules).is_empty());
            debug!(
                "generation complete: {}x{} grid in {} steps",
                self.grid.width(),
                self.grid.height(),
                self.steps
            );
            self.terminal = Some(Terminal::Done);
            self.last_event = Some(StepEvent::Completed);
            return StepResult::Completed;
        };

        let allowed = update_constraints(&mut self.grid, &self.rules, at);
        match self.rng.choose_uniform(allowed) {
            Some(tile) => self.collapse(at, tile, true),
            None => self.fail(at, ContradictionSource::Selection),
        }
    }

    fn collapse(&mut self, at: Coord, tile: TileId, chosen: bool) -> StepResult {
        self.grid.collapse(at, tile);
        self.queue.enqueue_neighbors(&self.grid, at);
        self.last_event = Some(StepEvent::Collapsed { at, tile, chosen });
        StepResult::Continuing
    }

    fn fail(&mut self, at: Coord, source: ContradictionSource) -> StepResult {
        let contradiction = Contradiction { at, source };
        debug!(
            "contradiction at ({}, {}) during {:?} after {} steps",
            at.x, at.y, source, self.steps
        );
        self.terminal = Some(Terminal::Failed(contradiction));
        self.last_event = Some(StepEvent::Contradiction(contradiction));
        StepResult::Contradiction
    }

    /// Current state machine position.
    pub fn state(&self) -> SolverState {
        match self.terminal {
            Some(Terminal::Done) => SolverState::Done,
            Some(Terminal::Failed(_)) => SolverState::Contradiction,
            None if self.queue.is_empty() => SolverState::Selecting,
            None => SolverState::Propagating,
        }
    }

    /// Whether the cell at `at` holds a final tile.
    pub fn is_collapsed(&self, at: Coord) -> Result<bool, GridError> {
        Ok(self.grid.get(at)?.is_collapsed())
    }

    /// Final tile at `at`, or `None` while it is still uncertain.
    pub fn tile_at(&self, at: Coord) -> Result<Option<TileId>, GridError> {
        Ok(self.grid.get(at)?.tile())
    }

    /// Tiles still possible at `at`.
    pub fn possibilities_at(&self, at: Coord) -> Result<Possibilities, GridError> {
        Ok(self.grid.get(at)?.possibilities())
    }

    /// Failure details, if the run ended in a contradiction.
    pub fn contradiction(&self) -> Option<Contradiction> {
        match self.terminal {
            Some(Terminal::Failed(c)) => Some(c),
            _ => None,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn rules(&self) -> &AdjacencyRules {
        &self.rules
    }

    /// Coordinate collapsed to seed the run.
    pub fn start(&self) -> Coord {
        self.start
    }

    /// Number of `step()` calls that performed work.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Pending propagation tasks.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Event describing the last unit of work (or the seed collapse).
    pub fn last_event(&self) -> Option<StepEvent> {
        self.last_event
    }

    /// Give up the solver and keep its grid.
    pub fn into_grid(self) -> Grid {
        self.grid
    }
}

fn check_tile(alphabet: Possibilities, tile: TileId, context: &str) -> Result<(), ConfigError> {
    if alphabet.contains(tile) {
        Ok(())
    } else {
        Err(ConfigError::UnknownTile {
            name: format!("#{}", tile.index()),
            context: context.to_string(),
        })
    }
}
