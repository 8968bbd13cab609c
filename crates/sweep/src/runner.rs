//! Sweep execution.
//!
//! Runs `num_sims` repetitions of every committed fraction on the grid and
//! streams each result to the output file as soon as it is available.

use naming_core::{Simulation, SimulationConfig, SimulationResult};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;

use crate::config::SweepConfig;
use crate::error::SweepError;
use crate::output::{result_path, ResultWriter};

/// Invocation parameters that are not part of the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepParams {
    pub population_size: usize,
    pub num_sims: u64,
    /// Distinguishes output files when several machines run the same sweep
    pub file_num: u32,
    pub output_dir: PathBuf,
}

/// What a finished sweep produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepSummary {
    pub runs: u64,
    pub consensus_runs: u64,
    pub output_path: PathBuf,
}

/// Source of per-run generators.
enum SeedSource {
    Seeded(SmallRng),
    Entropy,
}

impl SeedSource {
    fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => SeedSource::Seeded(SmallRng::seed_from_u64(seed)),
            None => SeedSource::Entropy,
        }
    }

    fn next_rng(&mut self) -> SmallRng {
        match self {
            SeedSource::Seeded(master) => SmallRng::seed_from_u64(master.gen()),
            SeedSource::Entropy => SmallRng::from_entropy(),
        }
    }
}

/// A configured sweep, ready to run.
#[derive(Debug, Clone)]
pub struct Sweep {
    params: SweepParams,
    config: SweepConfig,
    fractions: Vec<f64>,
}

impl Sweep {
    /// Validates every grid point up front so a bad invocation fails before
    /// any output file is created.
    pub fn new(params: SweepParams, config: SweepConfig) -> Result<Self, SweepError> {
        config.validate()?;
        let fractions = config.grid.fractions();
        for &fraction in &fractions {
            run_config(&params, &config, fraction).validate()?;
        }
        Ok(Self {
            params,
            config,
            fractions,
        })
    }

    pub fn fractions(&self) -> &[f64] {
        &self.fractions
    }

    /// Total number of simulations this sweep will run.
    pub fn total_runs(&self) -> u64 {
        self.params.num_sims * self.fractions.len() as u64
    }

    pub fn output_path(&self) -> PathBuf {
        result_path(
            &self.params.output_dir,
            &self.config.output.file_stem,
            self.params.file_num,
            self.config.output.format,
        )
    }

    /// Runs the sweep, writing to the configured output file.
    pub fn run(&self) -> Result<SweepSummary, SweepError> {
        let mut writer = ResultWriter::create(self.output_path(), self.config.output.format)?;
        tracing::info!(
            path = %writer.path().display(),
            total_runs = self.total_runs(),
            "writing results"
        );

        let mut consensus_runs = 0;
        let runs = self.run_with(|result| {
            if result.reached_consensus() {
                consensus_runs += 1;
            }
            writer.append(result).map_err(SweepError::from)
        })?;

        Ok(SweepSummary {
            runs,
            consensus_runs,
            output_path: writer.path().to_path_buf(),
        })
    }

    /// Runs the sweep, handing each result to `sink`. Returns the run count.
    pub fn run_with<F>(&self, mut sink: F) -> Result<u64, SweepError>
    where
        F: FnMut(&SimulationResult) -> Result<(), SweepError>,
    {
        let mut seeds = SeedSource::new(self.config.run.seed);
        let progress_every = self.config.output.progress_every;
        let mut counter: u64 = 0;

        for _ in 0..self.params.num_sims {
            for &fraction in &self.fractions {
                if counter % progress_every == 0 {
                    tracing::info!(completed = counter, "{} simulations complete", counter);
                }

                let config = run_config(&self.params, &self.config, fraction);
                let result = Simulation::new(config, seeds.next_rng())?.run();
                counter += 1;

                sink(&result)?;
            }
        }

        tracing::info!(completed = counter, "sweep finished");
        Ok(counter)
    }
}

fn run_config(params: &SweepParams, config: &SweepConfig, fraction: f64) -> SimulationConfig {
    SimulationConfig::new(params.population_size, fraction).with_max_rounds(config.run.max_rounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;

    fn params(population_size: usize, num_sims: u64) -> SweepParams {
        SweepParams {
            population_size,
            num_sims,
            file_num: 1,
            output_dir: PathBuf::from("unused"),
        }
    }

    fn small_config(seed: Option<u64>) -> SweepConfig {
        let mut config = SweepConfig::default();
        config.grid = GridConfig {
            start_percent: 10,
            end_percent: 30,
            step_percent: 10,
        };
        config.run.max_rounds = 20;
        config.run.seed = seed;
        config
    }

    #[test]
    fn test_rejects_tiny_population() {
        assert!(matches!(
            Sweep::new(params(1, 1), SweepConfig::default()),
            Err(SweepError::Simulation(_))
        ));
    }

    #[test]
    fn test_run_order_and_count() {
        let sweep = Sweep::new(params(10, 2), small_config(Some(1))).unwrap();
        assert_eq!(sweep.total_runs(), 6);

        let mut seen = Vec::new();
        let runs = sweep
            .run_with(|result| {
                seen.push(result.committed_fraction);
                Ok(())
            })
            .unwrap();

        assert_eq!(runs, 6);
        assert_eq!(seen, vec![0.1, 0.2, 0.3, 0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_seeded_sweep_is_reproducible() {
        let collect = || {
            let sweep = Sweep::new(params(12, 3), small_config(Some(99))).unwrap();
            let mut results = Vec::new();
            sweep
                .run_with(|result| {
                    results.push(result.clone());
                    Ok(())
                })
                .unwrap();
            results
        };

        assert_eq!(collect(), collect());
    }

    #[test]
    fn test_output_path_uses_file_number() {
        let mut p = params(10, 1);
        p.file_num = 7;
        p.output_dir = PathBuf::from("results");
        let sweep = Sweep::new(p, SweepConfig::default()).unwrap();
        assert_eq!(sweep.output_path(), PathBuf::from("results").join("SNGSimulations7.csv"));
    }
}
