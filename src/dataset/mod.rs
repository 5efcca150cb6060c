//! Dataset loading.
//!
//! Reads the bundled JSON dataset (a top-level array of row objects) into
//! an ordered list of [`Record`]s. No values are checked or cleaned here;
//! numeric coercion belongs to the aggregator.

use crate::analysis::is_coerced;
use crate::models::Record;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while loading a dataset file.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read dataset {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Options for loading a dataset.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Whether to show a spinner while reading.
    pub show_progress: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            show_progress: true,
        }
    }
}

/// Parse dataset rows from a JSON string.
pub fn parse_records(json: &str) -> Result<Vec<Record>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Load all records from a dataset file, preserving row order.
pub fn load_records(path: &Path, options: &LoadOptions) -> Result<Vec<Record>, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::NotFound(path.to_path_buf()));
    }

    debug!("Reading dataset from {}", path.display());

    let pb = if options.show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Loading {}", path.display()));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let result = read_and_parse(path);

    if let Some(pb) = pb {
        match &result {
            Ok(records) => pb.finish_with_message(format!("Loaded {} records", records.len())),
            Err(_) => pb.abandon_with_message("Failed to load dataset"),
        }
    }

    let records = result?;
    info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

fn read_and_parse(path: &Path) -> Result<Vec<Record>, DatasetError> {
    let content = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_records(&content).map_err(|source| DatasetError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Counts describing a loaded dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetSummary {
    pub records: usize,
    pub years: usize,
    pub crops: usize,
    /// Numeric fields that will be read as zero.
    pub coerced_values: usize,
}

impl DatasetSummary {
    pub fn from_records(records: &[Record]) -> Self {
        let years: HashSet<&str> = records.iter().map(|r| r.year.as_str()).collect();
        let crops: HashSet<&str> = records.iter().map(|r| r.crop_name.as_str()).collect();
        let coerced_values = records
            .iter()
            .flat_map(|r| [&r.production, &r.crop_yield, &r.cultivation_area])
            .filter(|field| is_coerced(field))
            .count();

        Self {
            records: records.len(),
            years: years.len(),
            crops: crops.len(),
            coerced_values,
        }
    }
}
