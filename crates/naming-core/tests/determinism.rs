//! Determinism verification tests
//!
//! Tests to ensure the simulation produces identical results given the same seed.

use naming_core::{Norm, Population, Simulation, SimulationConfig};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn seeded_history(seed: u64, n: usize, fraction: f64) -> Vec<Norm> {
    let config = SimulationConfig::new(n, fraction).with_max_rounds(50);
    let sim = Simulation::new(config, SmallRng::seed_from_u64(seed)).unwrap();
    sim.run_with_history().1
}

/// Test that a seeded run produces identical histories
#[test]
fn test_history_determinism() {
    let history1 = seeded_history(42, 30, 0.15);
    let history2 = seeded_history(42, 30, 0.15);

    assert!(!history1.is_empty());
    assert_eq!(history1, history2, "Histories should be identical with same seed");
}

/// Test that the serialized result is byte-identical across runs
#[test]
fn test_result_bytes_identical() {
    let run = |seed: u64| {
        let config = SimulationConfig::new(25, 0.12);
        let sim = Simulation::new(config, SmallRng::seed_from_u64(seed)).unwrap();
        serde_json::to_vec(&sim.run()).unwrap()
    };

    assert_eq!(run(777), run(777));
}

/// Test that different seeds produce different histories
#[test]
fn test_different_seeds() {
    let history1 = seeded_history(42, 40, 0.05);
    let history2 = seeded_history(43, 40, 0.05);

    assert_ne!(history1, history2, "Different seeds should produce different histories");
}

/// Test that step-by-step interaction matches a full run
#[test]
fn test_manual_stepping_matches_run() {
    let seed = 12345u64;
    let n = 10;

    let config = SimulationConfig::new(n, 1.0).with_max_rounds(5);
    let (result, history) = Simulation::new(config, SmallRng::seed_from_u64(seed))
        .unwrap()
        .run_with_history();

    let mut population = Population::new(n, 1.0).unwrap();
    let mut rng = SmallRng::seed_from_u64(seed);
    let manual: Vec<Norm> = (0..history.len()).map(|_| population.interact(&mut rng)).collect();

    assert_eq!(manual, history);
    // Everyone is committed, so the first round already reaches consensus
    assert_eq!(result.num_interactions, n as u64);
}

/// Test that converged windows stay converged
#[test]
fn test_consensus_window_is_all_a() {
    for seed in 0..20u64 {
        let config = SimulationConfig::new(20, 0.3);
        let (result, history) = Simulation::new(config, SmallRng::seed_from_u64(seed))
            .unwrap()
            .run_with_history();

        if result.reached_consensus() {
            let window = &history[history.len() - 20..];
            assert!(window.iter().all(|w| *w == Norm::A));
        }
        assert!(result.num_interactions <= 100 * 20);
        assert!((result.proportion_a + result.proportion_b - 1.0).abs() < 1e-12);
    }
}
