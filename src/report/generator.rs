//! Report rendering.
//!
//! Turns a [`Report`] into a plain-text table, a Markdown document, or
//! JSON. Rendering only formats; entries are written in report order.

use crate::cli::OutputFormat;
use crate::models::{CropAveragesReport, Report, ReportMetadata, YearExtremesReport};
use anyhow::Result;
use std::io::Write;
use std::path::Path;

const YEAR_HEADERS: [&str; 3] = [
    "Year",
    "Crop with Maximum Production",
    "Crop with Minimum Production",
];

const CROP_HEADERS: [&str; 3] = [
    "Crop Name",
    "Average Yield (Kg/Ha)",
    "Average Cultivation Area (Ha)",
];

/// Render a report in the requested format.
pub fn render(report: &Report, format: OutputFormat, decimals: usize) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(generate_table_report(report, decimals)),
        OutputFormat::Markdown => Ok(generate_markdown_report(report, decimals)),
        OutputFormat::Json => generate_json_report(report),
    }
}

fn year_rows(report: &YearExtremesReport) -> Vec<[String; 3]> {
    report
        .iter()
        .map(|e| {
            [
                e.year.clone(),
                e.max_production_crop.clone(),
                e.min_production_crop.clone(),
            ]
        })
        .collect()
}

fn crop_rows(report: &CropAveragesReport, decimals: usize) -> Vec<[String; 3]> {
    report
        .iter()
        .map(|e| {
            [
                e.crop_name.clone(),
                format!("{:.*}", decimals, e.average_yield),
                format!("{:.*}", decimals, e.average_cultivation_area),
            ]
        })
        .collect()
}

/// Generate fixed-width text tables for terminal output.
pub fn generate_table_report(report: &Report, decimals: usize) -> String {
    let mut output = String::new();

    output.push_str("Crop production extremes by year\n\n");
    output.push_str(&text_table(&YEAR_HEADERS, &year_rows(&report.year_extremes), false));
    output.push('\n');

    output.push_str("Average yield and cultivation area by crop\n\n");
    output.push_str(&text_table(
        &CROP_HEADERS,
        &crop_rows(&report.crop_averages, decimals),
        true,
    ));

    output
}

/// Lay out rows under headers, padding each column to its widest cell.
/// Numeric columns (all but the first) are right-aligned when requested.
fn text_table(headers: &[&str; 3], rows: &[[String; 3]], align_numbers: bool) -> String {
    if rows.is_empty() {
        return "No records.\n".to_string();
    }

    let mut widths = headers.map(str::len);
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: [&str; 3]| -> String {
        let mut line = String::new();
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                line.push_str("  ");
            }
            if align_numbers && i > 0 {
                line.push_str(&format!("{:>width$}", cell, width = widths[i]));
            } else {
                line.push_str(&format!("{:<width$}", cell, width = widths[i]));
            }
        }
        line.truncate(line.trim_end().len());
        line.push('\n');
        line
    };

    let mut table = format_row(*headers);
    table.push_str(&"-".repeat(widths.iter().sum::<usize>() + 4));
    table.push('\n');
    for row in rows {
        table.push_str(&format_row([row[0].as_str(), row[1].as_str(), row[2].as_str()]));
    }

    table
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, decimals: usize) -> String {
    let mut output = String::new();

    output.push_str("# Crop Statistics Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));

    output.push_str("## Production Extremes by Year\n\n");
    output.push_str(&markdown_table(
        &YEAR_HEADERS,
        &year_rows(&report.year_extremes),
    ));

    output.push_str("## Averages by Crop\n\n");
    output.push_str(&markdown_table(
        &CROP_HEADERS,
        &crop_rows(&report.crop_averages, decimals),
    ));

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Dataset:** `{}`\n", metadata.dataset));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Records:** {}\n", metadata.records));
    section.push_str(&format!("- **Years:** {}\n", metadata.years));
    section.push_str(&format!("- **Crops:** {}\n", metadata.crops));
    if metadata.coerced_values > 0 {
        section.push_str(&format!(
            "- **Values read as zero:** {}\n",
            metadata.coerced_values
        ));
    }
    section.push_str(&format!(
        "- **Extremum tracking:** {}\n",
        metadata.extremum_mode
    ));
    section.push('\n');

    section
}

fn markdown_table(headers: &[&str; 3], rows: &[[String; 3]]) -> String {
    if rows.is_empty() {
        return "No records.\n\n".to_string();
    }

    let mut table = String::new();
    table.push_str(&format!("| {} | {} | {} |\n", headers[0], headers[1], headers[2]));
    table.push_str("|:---|:---|:---|\n");
    for row in rows {
        table.push_str(&format!(
            "| {} | {} | {} |\n",
            escape_cell(&row[0]),
            escape_cell(&row[1]),
            escape_cell(&row[2])
        ));
    }
    table.push('\n');

    table
}

/// Keep a cell on one table row.
fn escape_cell(cell: &str) -> String {
    cell.replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
        .replace('|', "\\|")
}

/// Generate the report footer.
fn generate_footer() -> String {
    format!("---\n\n*Report generated by cropstats v{}*\n", env!("CARGO_PKG_VERSION"))
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write rendered output to a file.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}
