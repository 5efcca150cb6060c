//! Data models for the crop statistics reports.
//!
//! This module contains the dataset row type and the derived report
//! structures produced by the aggregator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Raw value of a numeric column as it appears in the dataset.
///
/// Rows may carry numbers, numeric text, free text, or nothing at all.
/// The value is kept as-is; coercion to `f64` happens during aggregation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericField {
    /// A JSON number.
    Number(f64),
    /// A JSON string, numeric or not.
    Text(String),
    /// Absent or `null`.
    #[default]
    Missing,
    /// Anything else (booleans, arrays, objects).
    Other(serde_json::Value),
}

impl From<f64> for NumericField {
    fn from(value: f64) -> Self {
        NumericField::Number(value)
    }
}

impl From<&str> for NumericField {
    fn from(value: &str) -> Self {
        NumericField::Text(value.to_string())
    }
}

/// How the per-year extremes are tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExtremumMode {
    /// Look up the tracked crop's production again from the first row
    /// matching (year, crop) on every comparison.
    #[default]
    Rederive,
    /// Keep the tracked production values next to the crop names.
    Running,
}

impl fmt::Display for ExtremumMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtremumMode::Rederive => write!(f, "rederive"),
            ExtremumMode::Running => write!(f, "running"),
        }
    }
}

/// One row of the agricultural dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Country", default, deserialize_with = "text_or_number")]
    pub country: String,
    #[serde(rename = "Year", default, deserialize_with = "text_or_number")]
    pub year: String,
    #[serde(rename = "Crop Name", default, deserialize_with = "text_or_number")]
    pub crop_name: String,
    /// Tonnes.
    #[serde(rename = "Crop Production (UOM:t(Tonnes))", default)]
    pub production: NumericField,
    /// Kilograms per hectare.
    #[serde(rename = "Yield Of Crops (UOM:Kg/Ha(KilogramperHectare))", default)]
    pub crop_yield: NumericField,
    /// Hectares.
    #[serde(rename = "Area Under Cultivation (UOM:Ha(Hectares))", default)]
    pub cultivation_area: NumericField,
}

#[cfg(test)]
impl Record {
    /// Creates a record for the given year and crop with the numeric
    /// fields left missing.
    pub fn new(year: impl Into<String>, crop_name: impl Into<String>) -> Self {
        Self {
            country: String::new(),
            year: year.into(),
            crop_name: crop_name.into(),
            production: NumericField::Missing,
            crop_yield: NumericField::Missing,
            cultivation_area: NumericField::Missing,
        }
    }

    pub fn with_production(mut self, production: impl Into<NumericField>) -> Self {
        self.production = production.into();
        self
    }

    pub fn with_yield(mut self, crop_yield: impl Into<NumericField>) -> Self {
        self.crop_yield = crop_yield.into();
        self
    }

    pub fn with_cultivation_area(mut self, area: impl Into<NumericField>) -> Self {
        self.cultivation_area = area.into();
        self
    }
}

/// Accepts a JSON string, number, or null for a text column.
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Crops with the highest and lowest production for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearExtremesEntry {
    pub year: String,
    pub max_production_crop: String,
    pub min_production_crop: String,
}

/// Per-year extremes, in first-seen year order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct YearExtremesReport {
    pub entries: Vec<YearExtremesEntry>,
}

#[cfg(test)]
impl YearExtremesReport {
    /// Returns the entry for a year, if any record carried it.
    pub fn get(&self, year: &str) -> Option<&YearExtremesEntry> {
        self.entries.iter().find(|e| e.year == year)
    }
}

impl YearExtremesReport {
    pub fn iter(&self) -> std::slice::Iter<'_, YearExtremesEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Average yield and cultivation area for one crop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropAverageEntry {
    pub crop_name: String,
    /// Kilograms per hectare.
    pub average_yield: f64,
    /// Hectares.
    pub average_cultivation_area: f64,
}

/// Per-crop averages, in first-seen crop order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CropAveragesReport {
    pub entries: Vec<CropAverageEntry>,
}

#[cfg(test)]
impl CropAveragesReport {
    /// Returns the entry for a crop, if any record carried it.
    pub fn get(&self, crop_name: &str) -> Option<&CropAverageEntry> {
        self.entries.iter().find(|e| e.crop_name == crop_name)
    }
}

impl CropAveragesReport {
    pub fn iter(&self) -> std::slice::Iter<'_, CropAverageEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Metadata about a generated report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Path of the dataset file the records came from.
    pub dataset: String,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Number of records aggregated.
    pub records: usize,
    /// Number of distinct years.
    pub years: usize,
    /// Number of distinct crop names.
    pub crops: usize,
    /// Number of numeric fields that fell back to zero.
    pub coerced_values: usize,
    /// Extremum tracking mode used for the year report.
    pub extremum_mode: ExtremumMode,
}

/// The complete output of one run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub year_extremes: YearExtremesReport,
    pub crop_averages: CropAveragesReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_from_dataset_keys() {
        let json = r#"{
            "Country": "India",
            "Year": "Financial Year (Apr - Mar), 1950",
            "Crop Name": "Rice",
            "Crop Production (UOM:t(Tonnes))": 20580000,
            "Yield Of Crops (UOM:Kg/Ha(KilogramperHectare))": "0.67",
            "Area Under Cultivation (UOM:Ha(Hectares))": ""
        }"#;

        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.country, "India");
        assert_eq!(record.crop_name, "Rice");
        assert_eq!(record.production, NumericField::Number(20580000.0));
        assert_eq!(record.crop_yield, NumericField::Text("0.67".to_string()));
        assert_eq!(record.cultivation_area, NumericField::Text(String::new()));
    }

    #[test]
    fn test_record_missing_and_odd_fields() {
        let json = r#"{
            "Year": 1999,
            "Crop Name": "Wheat",
            "Crop Production (UOM:t(Tonnes))": null,
            "Yield Of Crops (UOM:Kg/Ha(KilogramperHectare))": true
        }"#;

        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.country, "");
        assert_eq!(record.year, "1999");
        assert_eq!(record.production, NumericField::Missing);
        assert_eq!(
            record.crop_yield,
            NumericField::Other(serde_json::Value::Bool(true))
        );
        assert_eq!(record.cultivation_area, NumericField::Missing);
    }

    #[test]
    fn test_extremum_mode_display() {
        assert_eq!(ExtremumMode::default(), ExtremumMode::Rederive);
        assert_eq!(ExtremumMode::Rederive.to_string(), "rederive");
        assert_eq!(ExtremumMode::Running.to_string(), "running");
    }

    #[test]
    fn test_report_lookup() {
        let report = YearExtremesReport {
            entries: vec![YearExtremesEntry {
                year: "2000".to_string(),
                max_production_crop: "Rice".to_string(),
                min_production_crop: "Jute".to_string(),
            }],
        };
        assert_eq!(report.len(), 1);
        assert_eq!(
            report.get("2000").map(|e| e.max_production_crop.as_str()),
            Some("Rice")
        );
        assert!(report.get("2001").is_none());
        assert!(CropAveragesReport::default().is_empty());
    }
}
