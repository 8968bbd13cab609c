//! Error type for the sweep driver.

use naming_core::SimError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::output::OutputError;

/// Anything that can stop a sweep.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error(transparent)]
    Simulation(#[from] SimError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("output error: {0}")]
    Output(#[from] OutputError),
}
