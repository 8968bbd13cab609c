//! Core of the committed-minority naming game: agents, the population they
//! live in, and single simulation runs.
//!
//! # Example
//!
//! ```
//! use naming_core::{run_simulation_with_rng, Norm};
//! use rand::rngs::SmallRng;
//! use rand::SeedableRng;
//!
//! let mut rng = SmallRng::seed_from_u64(42);
//! let result = run_simulation_with_rng(2, 1.0, 1, &mut rng).unwrap();
//! assert_eq!(result.proportion_a, 1.0);
//! assert_eq!(Norm::COMMITTED, Norm::A);
//! ```

pub mod agent;
pub mod error;
pub mod population;
pub mod simulation;

pub use agent::{Agent, Memory, Norm};
pub use error::{Result, SimError};
pub use population::{committed_count, Census, Interaction, Population, MIN_POPULATION};
pub use simulation::{
    run_simulation, run_simulation_with_rng, Simulation, SimulationConfig, SimulationResult,
    DEFAULT_MAX_ROUNDS, MAX_MEMORY_SENTINEL,
};
