//! Simulation Runs
//!
//! Drives one population through repeated interactions until it reaches
//! consensus on the committed norm or exhausts its interaction budget.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::agent::Norm;
use crate::error::{Result, SimError};
use crate::population::{Population, MIN_POPULATION};

/// Default cap on rounds, where a round is `population_size` interactions.
pub const DEFAULT_MAX_ROUNDS: u64 = 100;

/// Placeholder written in the `maxMemory` column so results line up with
/// runs from the bounded-memory variant of the game.
pub const MAX_MEMORY_SENTINEL: u32 = 999;

/// Parameters for a single run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub population_size: usize,
    pub committed_fraction: f64,
    pub max_rounds: u64,
}

impl SimulationConfig {
    pub fn new(population_size: usize, committed_fraction: f64) -> Self {
        Self {
            population_size,
            committed_fraction,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    pub fn with_max_rounds(mut self, max_rounds: u64) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Check every parameter without building a population.
    pub fn validate(&self) -> Result<()> {
        if self.max_rounds == 0 {
            return Err(SimError::invalid("max_rounds must be at least 1"));
        }
        if self.population_size < MIN_POPULATION {
            return Err(SimError::invalid(format!(
                "population size must be at least {}, got {}",
                MIN_POPULATION, self.population_size
            )));
        }
        if !(0.0..=1.0).contains(&self.committed_fraction) {
            return Err(SimError::invalid(format!(
                "committed fraction must be within [0, 1], got {}",
                self.committed_fraction
            )));
        }
        Ok(())
    }

    /// Hard cap on the number of interactions.
    pub fn interaction_budget(&self) -> u64 {
        self.max_rounds.saturating_mul(self.population_size as u64)
    }
}

/// Summary of a finished run.
///
/// Field names on the wire match the columns of the original result files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    #[serde(rename = "maxMemory")]
    pub max_memory: u32,
    pub num_interactions: u64,
    #[serde(rename = "popSize")]
    pub population_size: usize,
    #[serde(rename = "prop_CM")]
    pub committed_fraction: f64,
    #[serde(rename = "proportionA")]
    pub proportion_a: f64,
    #[serde(rename = "proportionB")]
    pub proportion_b: f64,
}

impl SimulationResult {
    /// True if the final round was spoken entirely in the committed norm.
    pub fn reached_consensus(&self) -> bool {
        self.proportion_a == 1.0
    }
}

/// A single run: one population plus the generator that drives it.
pub struct Simulation<R> {
    config: SimulationConfig,
    population: Population,
    rng: R,
}

impl<R: Rng> Simulation<R> {
    /// Validate `config` and build a fresh population.
    pub fn new(config: SimulationConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let population = Population::new(config.population_size, config.committed_fraction)?;
        Ok(Self {
            config,
            population,
            rng,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Run to completion and summarize.
    pub fn run(self) -> SimulationResult {
        self.run_with_history().0
    }

    /// Run to completion, also returning every spoken word in order.
    pub fn run_with_history(mut self) -> (SimulationResult, Vec<Norm>) {
        let n = self.population.size();
        let budget = self.config.interaction_budget();
        let mut history: Vec<Norm> = Vec::with_capacity(budget.min(1 << 20) as usize);
        let mut interactions: u64 = 0;

        loop {
            let word = self.population.interact(&mut self.rng);
            history.push(word);
            interactions += 1;

            let round_complete = interactions % n as u64 == 0;
            if round_complete && last_round(&history, n).iter().all(|w| *w == Norm::A) {
                break;
            }
            if interactions >= budget {
                break;
            }
        }

        let proportion_a = share_of(last_round(&history, n), Norm::A);
        let result = SimulationResult {
            max_memory: MAX_MEMORY_SENTINEL,
            num_interactions: interactions,
            population_size: n,
            committed_fraction: self.population.committed_fraction(),
            proportion_a,
            proportion_b: 1.0 - proportion_a,
        };

        tracing::debug!(
            population_size = n,
            committed_fraction = result.committed_fraction,
            num_interactions = result.num_interactions,
            proportion_a = result.proportion_a,
            "simulation finished"
        );

        (result, history)
    }
}

/// The last `n` entries of `history`, or all of it if shorter.
fn last_round(history: &[Norm], n: usize) -> &[Norm] {
    &history[history.len().saturating_sub(n)..]
}

fn share_of(window: &[Norm], norm: Norm) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    let hits = window.iter().filter(|w| **w == norm).count();
    hits as f64 / window.len() as f64
}

/// Run one simulation with a fresh entropy-seeded generator.
pub fn run_simulation(
    population_size: usize,
    committed_fraction: f64,
    max_rounds: u64,
) -> Result<SimulationResult> {
    run_simulation_with_rng(
        population_size,
        committed_fraction,
        max_rounds,
        &mut SmallRng::from_entropy(),
    )
}

/// Run one simulation driven by the caller's generator.
pub fn run_simulation_with_rng<R: Rng + ?Sized>(
    population_size: usize,
    committed_fraction: f64,
    max_rounds: u64,
    rng: &mut R,
) -> Result<SimulationResult> {
    let config =
        SimulationConfig::new(population_size, committed_fraction).with_max_rounds(max_rounds);
    Ok(Simulation::new(config, rng)?.run())
}
