//! Caller-side driving and retry policy.
//!
//! The solver never backtracks or retries. These helpers step a solver to a
//! terminal result and, on contradiction, start over with a fresh solver and
//! a new seed derived from a master seed.

use crate::error::ConfigError;
use crate::grid::Grid;
use crate::rng::{StdRandom, WfcRng};
use crate::solver::{Contradiction, SolverConfig, StepResult, WfcSolver};
use crate::tileset::Tileset;
use bevy_log::{info, warn};

/// How a driven run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Contradiction,
    /// The step cap was reached first
    StepLimit,
}

/// Call `step()` until the run ends or `max_steps` calls have been made.
pub fn run_to_end(solver: &mut WfcSolver, max_steps: Option<usize>) -> RunOutcome {
    let mut taken = 0;
    loop {
        if max_steps.is_some_and(|cap| taken >= cap) {
            return RunOutcome::StepLimit;
        }
        taken += 1;
        match solver.step() {
            StepResult::Continuing => {}
            StepResult::Completed => return RunOutcome::Completed,
            StepResult::Contradiction => return RunOutcome::Contradiction,
        }
    }
}

/// A successfully generated grid.
#[derive(Debug, Clone)]
pub struct Generated {
    pub grid: Grid,
    /// Seed of the attempt that succeeded.
    pub seed: u64,
    /// 1-based attempt number.
    pub attempt: usize,
    /// Steps the successful run took.
    pub steps: usize,
}

/// Errors from `generate`.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateError {
    Config(ConfigError),
    /// Every attempt failed
    Exhausted {
        attempts: usize,
        last_contradiction: Option<Contradiction>,
    },
}

impl std::fmt::Display for GenerateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateError::Config(e) => write!(f, "configuration error: {}", e),
            GenerateError::Exhausted {
                attempts,
                last_contradiction,
            } => {
                write!(f, "no consistent grid after {} attempts", attempts)?;
                if let Some(c) = last_contradiction {
                    write!(
                        f,
                        " (last contradiction at ({}, {}) during {:?})",
                        c.at.x, c.at.y, c.source
                    )?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for GenerateError {}

impl From<ConfigError> for GenerateError {
    fn from(e: ConfigError) -> Self {
        GenerateError::Config(e)
    }
}

/// Generate a grid, retrying with fresh solvers until one completes.
///
/// Each attempt seeds its own `StdRandom` from a draw of the master
/// generator, so a master seed reproduces the whole sequence of attempts.
pub fn generate(
    tileset: &Tileset,
    config: &SolverConfig,
    seed: u64,
    attempts: usize,
    max_steps: Option<usize>,
) -> Result<Generated, GenerateError> {
    let mut master = StdRandom::from_u64_seed(seed);
    let mut last_contradiction = None;

    for attempt in 1..=attempts {
        let run_seed = master.next_u64();
        let mut solver = WfcSolver::new(
            tileset.rules.clone(),
            config.clone(),
            Box::new(StdRandom::from_u64_seed(run_seed)),
        )?;

        match run_to_end(&mut solver, max_steps) {
            RunOutcome::Completed => {
                info!(
                    "generated {}x{} grid on attempt {} ({} steps, seed {})",
                    config.width,
                    config.height,
                    attempt,
                    solver.steps(),
                    run_seed
                );
                let steps = solver.steps();
                return Ok(Generated {
                    grid: solver.into_grid(),
                    seed: run_seed,
                    attempt,
                    steps,
                });
            }
            RunOutcome::Contradiction => {
                last_contradiction = solver.contradiction();
                if let Some(c) = last_contradiction {
                    warn!(
                        "attempt {}/{} hit a contradiction at ({}, {}) during {:?}",
                        attempt, attempts, c.at.x, c.at.y, c.source
                    );
                }
            }
            RunOutcome::StepLimit => {
                warn!(
                    "attempt {}/{} stopped at the step cap ({} steps)",
                    attempt,
                    attempts,
                    solver.steps()
                );
            }
        }
    }

    Err(GenerateError::Exhausted {
        attempts,
        last_contradiction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tileset::TilesetConfig;

    #[test]
    fn test_run_to_end_completes_landscape() {
        let tileset = TilesetConfig::landscape().build().unwrap();
        let mut solver = WfcSolver::new(
            tileset.rules.clone(),
            SolverConfig::new(6, 4),
            Box::new(StdRandom::from_u64_seed(11)),
        )
        .unwrap();

        let outcome = run_to_end(&mut solver, None);
        assert_ne!(outcome, RunOutcome::StepLimit);
        if outcome == RunOutcome::Completed {
            assert!(solver.grid().is_fully_collapsed());
        }
    }

    #[test]
    fn test_run_to_end_respects_cap() {
        let tileset = TilesetConfig::landscape().build().unwrap();
        let mut solver = WfcSolver::new(
            tileset.rules.clone(),
            SolverConfig::new(10, 10),
            Box::new(StdRandom::from_u64_seed(1)),
        )
        .unwrap();

        assert_eq!(run_to_end(&mut solver, Some(3)), RunOutcome::StepLimit);
        assert_eq!(solver.steps(), 3);
    }

    #[test]
    fn test_generate_is_reproducible() {
        let tileset = TilesetConfig::landscape().build().unwrap();
        let config = SolverConfig::new(20, 15);

        let a = generate(&tileset, &config, 2024, 50, None).unwrap();
        let b = generate(&tileset, &config, 2024, 50, None).unwrap();

        assert_eq!(a.grid, b.grid);
        assert_eq!(a.seed, b.seed);
        assert_eq!(a.attempt, b.attempt);
        assert!(a.grid.is_fully_collapsed());
        assert!(a.grid.violations(&tileset.rules).is_empty());
    }

    #[test]
    fn test_generate_reports_exhaustion() {
        // Start tile forced to conflict with a preset neighbor: every attempt fails
        let tileset = TilesetConfig::landscape().build().unwrap();
        let water = tileset.alphabet.id("water").unwrap();
        let snow = tileset.alphabet.id("snow").unwrap();
        let config = SolverConfig::new(3, 1)
            .with_start(crate::grid::Coord::new(0, 0))
            .with_start_tile(water)
            .with_preset(crate::grid::Coord::new(1, 0), snow);

        let err = generate(&tileset, &config, 1, 3, None).unwrap_err();
        match err {
            GenerateError::Exhausted {
                attempts,
                last_contradiction,
            } => {
                assert_eq!(attempts, 3);
                assert!(last_contradiction.is_some());
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_generate_surfaces_config_errors() {
        let tileset = TilesetConfig::landscape().build().unwrap();
        let err = generate(&tileset, &SolverConfig::new(0, 0), 1, 3, None).unwrap_err();
        assert!(matches!(err, GenerateError::Config(_)));
    }
}
