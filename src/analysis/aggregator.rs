//! Year extremes and crop averages.
//!
//! Both reports are derived from the full record sequence on every call.
//! Neither function fails: numeric fields that cannot be read count as zero.

use crate::models::{
    CropAverageEntry, CropAveragesReport, ExtremumMode, NumericField, Record, YearExtremesEntry,
    YearExtremesReport,
};
use std::collections::HashMap;

/// Read a numeric field, falling back to `default` when it holds no number.
///
/// Text is read up to the end of its leading decimal literal, so `"12.5 t"`
/// gives `12.5` and `"1,234"` gives `1`.
pub fn parse_numeric_or_default(raw: &NumericField, default: f64) -> f64 {
    let value = match raw {
        NumericField::Number(n) => Some(*n),
        NumericField::Text(s) => leading_float(s),
        NumericField::Missing | NumericField::Other(_) => None,
    };

    match value {
        Some(v) if !v.is_nan() => v,
        _ => default,
    }
}

/// Returns true when the field would fall back to the default.
pub fn is_coerced(raw: &NumericField) -> bool {
    match raw {
        NumericField::Number(n) => n.is_nan(),
        NumericField::Text(s) => leading_float(s).map_or(true, f64::is_nan),
        NumericField::Missing | NumericField::Other(_) => true,
    }
}

/// Parse the longest decimal literal at the start of `s`.
fn leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    if s[end..].starts_with("Infinity") {
        let sign = if s.starts_with('-') { -1.0 } else { 1.0 };
        return Some(sign * f64::INFINITY);
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }

    // Only take the exponent when at least one digit follows it
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

fn production_of(record: &Record) -> f64 {
    parse_numeric_or_default(&record.production, 0.0)
}

/// Production of the first record matching (year, crop) anywhere in `records`.
fn first_production(records: &[Record], year: &str, crop: &str) -> f64 {
    records
        .iter()
        .find(|r| r.year == year && r.crop_name == crop)
        .map(production_of)
        .unwrap_or(0.0)
}

/// Tracked state for one year while building the extremes report.
struct Tracked {
    max_crop: String,
    min_crop: String,
    max_value: f64,
    min_value: f64,
}

/// Find the crops with maximum and minimum production for each year.
///
/// Years appear in the order they are first seen. On ties the crop seen
/// first is kept.
pub fn year_extremes(records: &[Record], mode: ExtremumMode) -> YearExtremesReport {
    let mut order: Vec<&str> = Vec::new();
    let mut tracked: HashMap<&str, Tracked> = HashMap::new();

    for record in records {
        let year = record.year.as_str();
        let crop = record.crop_name.as_str();
        let production = production_of(record);

        let Some(state) = tracked.get_mut(year) else {
            order.push(year);
            tracked.insert(
                year,
                Tracked {
                    max_crop: crop.to_string(),
                    min_crop: crop.to_string(),
                    max_value: production,
                    min_value: production,
                },
            );
            continue;
        };

        let (current_max, current_min) = match mode {
            ExtremumMode::Rederive => (
                first_production(records, year, &state.max_crop),
                first_production(records, year, &state.min_crop),
            ),
            ExtremumMode::Running => (state.max_value, state.min_value),
        };

        if production > current_max {
            state.max_crop = crop.to_string();
            state.max_value = production;
        }
        if production < current_min {
            state.min_crop = crop.to_string();
            state.min_value = production;
        }
    }

    let entries = order
        .into_iter()
        .filter_map(|year| {
            tracked.remove(year).map(|state| YearExtremesEntry {
                year: year.to_string(),
                max_production_crop: state.max_crop,
                min_production_crop: state.min_crop,
            })
        })
        .collect();

    YearExtremesReport { entries }
}

#[derive(Default)]
struct Totals {
    yield_sum: f64,
    area_sum: f64,
    count: usize,
}

/// Compute the average yield and cultivation area for each crop.
///
/// Every record counts toward its crop's denominator, including records
/// whose numeric fields fell back to zero.
pub fn crop_averages(records: &[Record]) -> CropAveragesReport {
    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, Totals> = HashMap::new();

    for record in records {
        let crop = record.crop_name.as_str();
        let entry = totals.entry(crop).or_insert_with(|| {
            order.push(crop);
            Totals::default()
        });

        entry.yield_sum += parse_numeric_or_default(&record.crop_yield, 0.0);
        entry.area_sum += parse_numeric_or_default(&record.cultivation_area, 0.0);
        entry.count += 1;
    }

    let entries = order
        .into_iter()
        .filter_map(|crop| {
            totals.get(crop).map(|t| {
                let count = t.count as f64;
                CropAverageEntry {
                    crop_name: crop.to_string(),
                    average_yield: t.yield_sum / count,
                    average_cultivation_area: t.area_sum / count,
                }
            })
        })
        .collect();

    CropAveragesReport { entries }
}
