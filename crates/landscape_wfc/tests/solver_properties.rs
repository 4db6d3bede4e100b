//! Whole-run behavior of the solver through the public API.

use landscape_wfc::{
    decorate, AdjacencyRules, ContradictionSource, Coord, Possibilities, SolverConfig,
    SolverState, StdRandom, StepResult, TileAlphabet, TileId, TilesetConfig, WfcSolver,
};

fn t(i: usize) -> TileId {
    TileId::new(i).unwrap()
}

fn two_tiles() -> TileAlphabet {
    TileAlphabet::new(["A", "B"]).unwrap()
}

fn seeded(seed: u64) -> Box<StdRandom> {
    Box::new(StdRandom::from_u64_seed(seed))
}

fn run(solver: &mut WfcSolver) -> StepResult {
    loop {
        match solver.step() {
            StepResult::Continuing => {}
            done => return done,
        }
    }
}

#[test]
fn test_permissive_grid_always_completes() {
    let rules = AdjacencyRules::permissive(&two_tiles());

    for seed in 0..25 {
        let mut solver =
            WfcSolver::new(rules.clone(), SolverConfig::new(3, 3), seeded(seed)).unwrap();
        assert_eq!(run(&mut solver), StepResult::Completed, "seed {}", seed);
        assert_eq!(solver.grid().collapsed_count(), 9);
        assert_eq!(solver.state(), SolverState::Done);
    }
}

#[test]
fn test_same_only_rules_force_the_start_tile_everywhere() {
    let alphabet = two_tiles();
    let rules = AdjacencyRules::new(
        &alphabet,
        vec![
            [Possibilities::single(t(0)); 4],
            [Possibilities::single(t(1)); 4],
        ],
    )
    .unwrap();

    for seed in 0..10 {
        let config = SolverConfig::new(2, 1)
            .with_start(Coord::new(0, 0))
            .with_start_tile(t(0));
        let mut solver = WfcSolver::new(rules.clone(), config, seeded(seed)).unwrap();

        assert_eq!(run(&mut solver), StepResult::Completed);
        assert_eq!(solver.tile_at(Coord::new(0, 0)), Ok(Some(t(0))));
        assert_eq!(solver.tile_at(Coord::new(1, 0)), Ok(Some(t(0))));
    }
}

#[test]
fn test_impossible_start_reports_contradiction_and_freezes() {
    // A only beside B and B only beside A; the start is forced to A next to a
    // preset A.
    let alphabet = two_tiles();
    let rules = AdjacencyRules::new(
        &alphabet,
        vec![
            [Possibilities::single(t(1)); 4],
            [Possibilities::single(t(0)); 4],
        ],
    )
    .unwrap();
    let config = SolverConfig::new(2, 1)
        .with_start(Coord::new(0, 0))
        .with_start_tile(t(0))
        .with_preset(Coord::new(1, 0), t(0));

    let mut solver = WfcSolver::new(rules, config, seeded(1)).unwrap();
    assert_eq!(solver.step(), StepResult::Contradiction);

    let contradiction = solver.contradiction().unwrap();
    assert_eq!(contradiction.at, Coord::new(0, 0));
    assert_eq!(contradiction.source, ContradictionSource::Seed);

    let frozen = solver.grid().clone();
    for _ in 0..5 {
        assert_eq!(solver.step(), StepResult::Contradiction);
    }
    assert_eq!(solver.grid(), &frozen);
    assert_eq!(solver.state(), SolverState::Contradiction);
}

#[test]
fn test_emptied_queued_cell_reports_contradiction_and_freezes() {
    // A beside A only, B beside B only; A and B fixed at both ends of a strip
    let alphabet = two_tiles();
    let rules = AdjacencyRules::new(
        &alphabet,
        vec![
            [Possibilities::single(t(0)); 4],
            [Possibilities::single(t(1)); 4],
        ],
    )
    .unwrap();
    let config = SolverConfig::new(3, 1)
        .with_start(Coord::new(0, 0))
        .with_preset(Coord::new(0, 0), t(0))
        .with_preset(Coord::new(2, 0), t(1));

    for seed in 0..5 {
        let mut solver = WfcSolver::new(rules.clone(), config.clone(), seeded(seed)).unwrap();
        assert_eq!(solver.step(), StepResult::Contradiction);

        let contradiction = solver.contradiction().unwrap();
        assert_eq!(contradiction.at, Coord::new(1, 0));
        assert_eq!(contradiction.source, ContradictionSource::Propagation);
        assert!(solver.possibilities_at(Coord::new(1, 0)).unwrap().is_empty());

        let frozen = solver.grid().clone();
        for _ in 0..5 {
            assert_eq!(solver.step(), StepResult::Contradiction);
        }
        assert_eq!(solver.grid(), &frozen);
        assert_eq!(solver.steps(), 1);
    }
}

#[test]
fn test_possibilities_only_shrink_and_collapsed_means_single() {
    let tileset = TilesetConfig::landscape().build().unwrap();

    for seed in 0..5 {
        let mut solver = WfcSolver::new(
            tileset.rules.clone(),
            SolverConfig::new(10, 8),
            seeded(seed),
        )
        .unwrap();

        let mut before = solver.grid().clone();
        loop {
            let result = solver.step();
            for ((_, old), (at, new)) in before.iter().zip(solver.grid().iter()) {
                assert!(
                    new.possibilities().is_subset_of(old.possibilities()),
                    "cell {:?} grew at step {}",
                    at,
                    solver.steps()
                );
                if old.is_collapsed() {
                    assert_eq!(old, new, "collapsed cell {:?} changed", at);
                }
                assert_eq!(new.is_collapsed(), new.tile().is_some());
                if new.is_collapsed() {
                    assert_eq!(new.possibilities().len(), 1);
                }
            }
            if result != StepResult::Continuing {
                break;
            }
            before = solver.grid().clone();
        }
    }
}

#[test]
fn test_completed_landscapes_satisfy_every_adjacency() {
    let tileset = TilesetConfig::landscape().build().unwrap();
    let mut completed = 0;

    for seed in 0..40 {
        let mut solver = WfcSolver::new(
            tileset.rules.clone(),
            SolverConfig::new(20, 15),
            seeded(seed),
        )
        .unwrap();

        match run(&mut solver) {
            StepResult::Completed => {
                completed += 1;
                assert!(solver.grid().is_fully_collapsed());
                assert!(solver.grid().violations(&tileset.rules).is_empty());
            }
            StepResult::Contradiction => {
                let c = solver.contradiction().unwrap();
                assert!(matches!(
                    c.source,
                    ContradictionSource::Propagation | ContradictionSource::Selection
                ));
                assert!(solver.possibilities_at(c.at).unwrap().is_empty());
            }
            StepResult::Continuing => unreachable!(),
        }
    }

    assert!(completed > 0, "no seed produced a full landscape");
}

#[test]
fn test_same_seed_gives_same_run() {
    let tileset = TilesetConfig::landscape().build().unwrap();
    let build = || {
        WfcSolver::new(
            tileset.rules.clone(),
            SolverConfig::new(16, 12),
            seeded(77),
        )
        .unwrap()
    };

    let mut a = build();
    let mut b = build();
    loop {
        let ra = a.step();
        let rb = b.step();
        assert_eq!(ra, rb);
        assert_eq!(a.last_event(), b.last_event());
        if ra != StepResult::Continuing {
            break;
        }
    }
    assert_eq!(a.grid(), b.grid());
    assert_eq!(a.steps(), b.steps());
}

#[test]
fn test_step_count_is_bounded() {
    let tileset = TilesetConfig::landscape().build().unwrap();
    let (w, h) = (14, 9);
    let bound = w * h + 4 * w * h + 1;

    for seed in 0..10 {
        let mut solver =
            WfcSolver::new(tileset.rules.clone(), SolverConfig::new(w, h), seeded(seed)).unwrap();
        let mut calls = 0;
        while solver.step() == StepResult::Continuing {
            calls += 1;
            assert!(calls <= bound, "seed {} exceeded {} steps", seed, bound);
        }
        assert!(solver.steps() <= bound);
    }
}

#[test]
fn test_decoration_leaves_the_grid_untouched() {
    let tileset = TilesetConfig::landscape().build().unwrap();
    let generated =
        landscape_wfc::generate(&tileset, &SolverConfig::new(20, 15), 5, 50, None).unwrap();

    let before = generated.grid.clone();
    let mut rng = StdRandom::from_u64_seed(generated.seed);
    let placed = decorate(&generated.grid, &tileset.decorations, &mut rng);

    assert_eq!(generated.grid, before);
    let water = tileset.alphabet.id("water").unwrap();
    let mountain = tileset.alphabet.id("mountain").unwrap();
    for d in &placed {
        assert_eq!(generated.grid.get(d.at).unwrap().tile(), Some(d.tile));
        assert_ne!(d.tile, water);
        assert_ne!(d.tile, mountain);
    }
}
