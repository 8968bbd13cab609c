//! Configuration loading for parameter sweeps.
//!
//! Sweep settings can be loaded from a TOML file; any section or field left
//! out falls back to its default.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Complete sweep configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Committed-fraction grid
    #[serde(default)]
    pub grid: GridConfig,
    /// Per-run settings
    #[serde(default)]
    pub run: RunConfig,
    /// Output file settings
    #[serde(default)]
    pub output: OutputConfig,
}

impl SweepConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the configuration as a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let grid = &self.grid;
        if grid.step_percent == 0 {
            return Err(ConfigError::Invalid("grid.step_percent must be positive".into()));
        }
        if grid.end_percent > 100 {
            return Err(ConfigError::Invalid(format!(
                "grid.end_percent must be at most 100, got {}",
                grid.end_percent
            )));
        }
        if grid.start_percent > grid.end_percent {
            return Err(ConfigError::Invalid(format!(
                "grid.start_percent ({}) exceeds grid.end_percent ({})",
                grid.start_percent, grid.end_percent
            )));
        }
        if self.run.max_rounds == 0 {
            return Err(ConfigError::Invalid("run.max_rounds must be positive".into()));
        }
        if self.output.progress_every == 0 {
            return Err(ConfigError::Invalid("output.progress_every must be positive".into()));
        }
        Ok(())
    }
}

/// Committed fractions to sweep, in whole percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// First committed percentage (inclusive)
    pub start_percent: u32,
    /// Last committed percentage (inclusive)
    pub end_percent: u32,
    /// Distance between grid points
    pub step_percent: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            start_percent: 5,
            end_percent: 30,
            step_percent: 1,
        }
    }
}

impl GridConfig {
    /// The committed fractions, computed as `percent / 100`.
    pub fn fractions(&self) -> Vec<f64> {
        (self.start_percent..=self.end_percent)
            .step_by(self.step_percent.max(1) as usize)
            .map(|percent| percent as f64 / 100.0)
            .collect()
    }
}

/// Settings applied to every simulation in the sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Interaction cap in rounds of `population_size` interactions
    pub max_rounds: u64,
    /// Master seed; runs are entropy-seeded when absent
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_rounds: naming_core::DEFAULT_MAX_ROUNDS,
            seed: None,
        }
    }
}

/// Where and how results are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// File name prefix; the file number and extension are appended
    pub file_stem: String,
    /// Log a progress line every this many runs
    pub progress_every: u64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Csv,
            file_stem: "SNGSimulations".to_string(),
            progress_every: 100,
        }
    }
}

/// Result file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Comma-separated rows with a header line
    #[default]
    Csv,
    /// One JSON object per line
    Jsonl,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Jsonl => "jsonl",
        }
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Error parsing TOML config
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// Error writing TOML config
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    /// A value is out of range
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Generates a default configuration file content.
pub fn default_config_toml() -> String {
    r#"# Committed-minority sweep configuration

[grid]
start_percent = 5
end_percent = 30
step_percent = 1

[run]
max_rounds = 100
# seed = 42

[output]
format = "csv"
file_stem = "SNGSimulations"
progress_every = 100
"#
    .to_string()
}
