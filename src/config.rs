//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.cropstats.toml` files.

use crate::cli::{Args, OutputFormat};
use crate::models::ExtremumMode;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = ".cropstats.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Dataset settings.
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Aggregation settings.
    #[serde(default)]
    pub aggregation: AggregationConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Where the records come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Path of the JSON dataset.
    #[serde(default = "default_dataset_path")]
    pub path: PathBuf,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
        }
    }
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("IndiaAgroDataset.json")
}

/// Aggregation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Extremum tracking mode for the per-year report.
    #[serde(default)]
    pub extremum_mode: ExtremumMode,
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Decimal places shown for averages.
    #[serde(default = "default_decimals")]
    pub decimals: usize,

    /// Output file; stdout when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            decimals: default_decimals(),
            output: None,
        }
    }
}

fn default_decimals() -> usize {
    3
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.cropstats.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(DEFAULT_CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(ref dataset) = args.dataset {
            self.dataset.path = dataset.clone();
        }

        if let Some(mode) = args.extremum_mode {
            self.aggregation.extremum_mode = mode;
        }

        if let Some(format) = args.format {
            self.report.format = format;
        }
        if let Some(decimals) = args.decimals {
            self.report.decimals = decimals;
        }
        if let Some(ref output) = args.output {
            self.report.output = Some(output.clone());
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.dataset.path, PathBuf::from("IndiaAgroDataset.json"));
        assert_eq!(config.aggregation.extremum_mode, ExtremumMode::Rederive);
        assert_eq!(config.report.format, OutputFormat::Table);
        assert_eq!(config.report.decimals, 3);
        assert!(config.report.output.is_none());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[dataset]
path = "data/agro.json"

[aggregation]
extremum_mode = "running"

[report]
format = "markdown"
decimals = 2
output = "crops.md"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.dataset.path, PathBuf::from("data/agro.json"));
        assert_eq!(config.aggregation.extremum_mode, ExtremumMode::Running);
        assert_eq!(config.report.format, OutputFormat::Markdown);
        assert_eq!(config.report.decimals, 2);
        assert_eq!(config.report.output, Some(PathBuf::from("crops.md")));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("[report]\nformat = \"json\"\n").unwrap();
        assert_eq!(config.report.format, OutputFormat::Json);
        assert_eq!(config.report.decimals, 3);
        assert_eq!(config.aggregation.extremum_mode, ExtremumMode::Rederive);
    }

    #[test]
    fn test_invalid_mode_rejected() {
        assert!(toml::from_str::<Config>("[aggregation]\nextremum_mode = \"fastest\"\n").is_err());
    }

    #[test]
    fn test_merge_with_args() {
        let mut config: Config = toml::from_str("[report]\nformat = \"markdown\"\ndecimals = 5\n").unwrap();
        let args = Args::parse_from(["cropstats", "--decimals", "1", "--extremum-mode", "running"]);

        config.merge_with_args(&args);

        assert_eq!(config.report.format, OutputFormat::Markdown);
        assert_eq!(config.report.decimals, 1);
        assert_eq!(config.aggregation.extremum_mode, ExtremumMode::Running);
    }

    #[test]
    fn test_load_from_dir() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "[report]\ndecimals = 4\n").unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(config.report.decimals, 4);

        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "[report\n").unwrap();
        assert!(Config::load_from_dir(dir.path()).is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[dataset]"));
        assert!(toml_str.contains("[aggregation]"));
        assert!(toml_str.contains("extremum_mode = \"rederive\""));
        assert!(toml_str.contains("[report]"));

        let round: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(round.report.decimals, 3);
    }
}
