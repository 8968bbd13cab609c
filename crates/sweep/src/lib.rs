//! Parameter sweeps over the committed-minority naming game.
//!
//! The sweep driver repeatedly calls the single-run entry point from
//! `naming-core` across a grid of committed fractions and appends every
//! result to a file that can be read while the sweep is still running.
//!
//! # Modules
//!
//! - [`config`]: TOML configuration for the grid, runs, and output
//! - [`runner`]: The sweep loop and per-run seeding
//! - [`output`]: CSV and JSON Lines result writers
//! - [`error`]: The driver's error type

pub mod config;
pub mod error;
pub mod output;
pub mod runner;

pub use config::{
    default_config_toml, ConfigError, GridConfig, OutputConfig, OutputFormat, RunConfig,
    SweepConfig,
};
pub use error::SweepError;
pub use output::{csv_row, result_path, OutputError, ResultReader, ResultWriter, CSV_HEADER};
pub use runner::{Sweep, SweepParams, SweepSummary};
