//! cropstats - agricultural dataset reports
//!
//! A CLI tool that reads a static agricultural dataset and reports the
//! crops with maximum and minimum production for each year, and the
//! average yield and cultivation area of each crop.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (invalid arguments, config, dataset, output)

mod analysis;
mod cli;
mod config;
mod dataset;
mod models;
mod report;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use cli::{Args, MAX_DECIMALS};
use config::{Config, DEFAULT_CONFIG_FILE};
use dataset::{DatasetSummary, LoadOptions};
use models::{Report, ReportMetadata};
use tracing::{debug, error, info, warn};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("cropstats v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(&args) {
        error!("Report failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .cropstats.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to set the dataset path, extremum mode, and report format.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// `RUST_LOG` takes precedence when set. Logs go to stderr so a report
/// printed to stdout stays clean.
fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::default().add_directive(LevelFilter::from_level(args.log_level()).into())
    });

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load the dataset, aggregate it, and write the report.
fn run(args: &Args) -> Result<()> {
    let mut config = load_config(args)?;
    config.merge_with_args(args);

    if config.report.decimals > MAX_DECIMALS {
        bail!(
            "report.decimals must be at most {} (got {})",
            MAX_DECIMALS,
            config.report.decimals
        );
    }

    let dataset_path = config.dataset.path.clone();
    let options = LoadOptions {
        show_progress: !args.quiet,
    };
    let records = dataset::load_records(&dataset_path, &options)?;

    let summary = DatasetSummary::from_records(&records);
    debug!(
        "{} years, {} crops, {} values read as zero",
        summary.years, summary.crops, summary.coerced_values
    );

    let mode = config.aggregation.extremum_mode;
    info!("Aggregating {} records (extremum mode: {})", summary.records, mode);

    let report = Report {
        metadata: ReportMetadata {
            dataset: dataset_path.display().to_string(),
            generated_at: Utc::now(),
            records: summary.records,
            years: summary.years,
            crops: summary.crops,
            coerced_values: summary.coerced_values,
            extremum_mode: mode,
        },
        year_extremes: analysis::year_extremes(&records, mode),
        crop_averages: analysis::crop_averages(&records),
    };

    if report.year_extremes.is_empty() && report.crop_averages.is_empty() {
        warn!("Dataset {} contains no records", dataset_path.display());
    }

    let output = report::render(&report, config.report.format, config.report.decimals)?;

    match config.report.output {
        Some(ref path) => {
            report::write_report(&output, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            if !args.quiet {
                println!(
                    "✅ {} years, {} crops. Report saved to: {}",
                    report.year_extremes.len(),
                    report.crop_averages.len(),
                    path.display()
                );
            }
        }
        None => print!("{}", output),
    }

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}
