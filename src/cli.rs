//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation.

use crate::models::ExtremumMode;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Largest number of decimals accepted for averages.
pub const MAX_DECIMALS: usize = 10;

/// cropstats - yearly production extremes and per-crop averages
///
/// Reads an agricultural dataset (JSON array of rows with country, year,
/// crop, production, yield and cultivation area) and reports, for each
/// year, the crops with maximum and minimum production, and for each
/// crop, its average yield and cultivation area.
///
/// Examples:
///   cropstats --dataset IndiaAgroDataset.json
///   cropstats -d IndiaAgroDataset.json --format markdown -o report.md
///   cropstats -d IndiaAgroDataset.json --extremum-mode running
///   cropstats --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Dataset file to read
    ///
    /// If not specified, uses the path from .cropstats.toml or
    /// IndiaAgroDataset.json in the current directory.
    #[arg(short, long, value_name = "FILE", env = "CROPSTATS_DATASET")]
    pub dataset: Option<PathBuf>,

    /// Write the report to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (table, markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// How per-year extremes are tracked
    ///
    /// "rederive" looks up a tracked crop's production from its first row
    /// for the year; "running" keeps the tracked values directly.
    #[arg(long, value_name = "MODE")]
    pub extremum_mode: Option<ExtremumMode>,

    /// Decimal places shown for averages
    #[arg(long, value_name = "N")]
    pub decimals: Option<usize>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .cropstats.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .cropstats.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain-text tables (default)
    #[default]
    Table,
    /// Markdown format
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(decimals) = self.decimals {
            if decimals > MAX_DECIMALS {
                return Err(format!("Decimals must be at most {}", MAX_DECIMALS));
            }
        }

        if let Some(ref dataset) = self.dataset {
            if !dataset.exists() {
                return Err(format!("Dataset file does not exist: {}", dataset.display()));
            }
            if dataset.is_dir() {
                return Err(format!("Dataset path is a directory: {}", dataset.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
