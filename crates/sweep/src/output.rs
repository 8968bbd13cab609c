//! Result output.
//!
//! Appends one record per finished simulation so a long sweep can be watched
//! (or copied off the machine) while it is still running.

use naming_core::SimulationResult;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::OutputFormat;

/// Column header for CSV output; the leading empty column is the row index.
pub const CSV_HEADER: &str = ",maxMemory,num_interactions,popSize,prop_CM,proportionA,proportionB";

/// Errors that can occur during output operations.
#[derive(Debug, Error)]
pub enum OutputError {
    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Path of the result file for a given stem, file number, and format.
pub fn result_path(output_dir: &Path, file_stem: &str, file_num: u32, format: OutputFormat) -> PathBuf {
    output_dir.join(format!("{}{}.{}", file_stem, file_num, format.extension()))
}

/// Streaming writer for simulation results.
///
/// The file is truncated when the writer is created and every record is
/// flushed as soon as it is written.
#[derive(Debug)]
pub struct ResultWriter {
    path: PathBuf,
    format: OutputFormat,
    writer: BufWriter<File>,
    records_written: u64,
}

impl ResultWriter {
    /// Creates the output directory if needed and opens `path` for writing.
    pub fn create(path: impl Into<PathBuf>, format: OutputFormat) -> Result<Self, OutputError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(&path)?;
        let mut writer = BufWriter::new(file);
        if format == OutputFormat::Csv {
            writeln!(writer, "{}", CSV_HEADER)?;
            writer.flush()?;
        }

        Ok(Self {
            path,
            format,
            writer,
            records_written: 0,
        })
    }

    /// Appends one record and flushes it to disk.
    pub fn append(&mut self, result: &SimulationResult) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Csv => writeln!(self.writer, "{}", csv_row(result))?,
            OutputFormat::Jsonl => {
                let json = serde_json::to_string(result)?;
                writeln!(self.writer, "{}", json)?;
            }
        }
        self.writer.flush()?;
        self.records_written += 1;
        Ok(())
    }

    /// Returns the number of records written.
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

/// Formats one CSV row, prefixed with row index 0.
///
/// Every record used to be written as its own one-row table, so the index
/// column is always 0.
pub fn csv_row(result: &SimulationResult) -> String {
    format!(
        "0,{},{},{},{:?},{:?},{:?}",
        result.max_memory,
        result.num_interactions,
        result.population_size,
        result.committed_fraction,
        result.proportion_a,
        result.proportion_b,
    )
}

/// Reads results back from a JSON Lines file.
#[derive(Debug)]
pub struct ResultReader {
    path: PathBuf,
}

impl ResultReader {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Reads every record, skipping blank lines.
    pub fn read_all(&self) -> Result<Vec<SimulationResult>, OutputError> {
        let reader = BufReader::new(File::open(&self.path)?);
        let mut results = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            results.push(serde_json::from_str(&line)?);
        }
        Ok(results)
    }
}
