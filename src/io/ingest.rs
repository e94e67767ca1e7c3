//! Batch CSV ingest.
//!
//! Turns a diamonds CSV into validated `DiamondFeatures` rows ready for the
//! pipeline.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors, exit code 3)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (rows keep their input order)

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{Clarity, Color, DiamondFeatures, Quality};
use crate::error::PricingError;

const REQUIRED_COLUMNS: [&str; 7] = [
    "weight", "length", "width", "depth", "quality", "color", "clarity",
];

/// One validated input row.
#[derive(Debug, Clone)]
pub struct DiamondRow {
    /// 1-based CSV line number (header is line 1).
    pub line: usize,
    /// Optional `id` column value, for exports.
    pub id: Option<String>,
    pub features: DiamondFeatures,
}

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: validated rows plus everything that went wrong.
#[derive(Debug, Clone)]
pub struct IngestedBatch {
    pub rows: Vec<DiamondRow>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Load and validate a diamonds CSV.
///
/// Required columns: `weight,length,width,depth,quality,color,clarity`
/// (case-insensitive, BOM-tolerant). An `id` column is carried through to
/// exports when present.
pub fn load_diamond_rows(path: &Path) -> Result<IngestedBatch, PricingError> {
    let file = File::open(path).map_err(|e| {
        PricingError::invalid_input("csv", format!("failed to open '{}': {e}", path.display()))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| {
            PricingError::invalid_input("csv", format!("failed to read headers: {e}"))
        })?
        .clone();
    let header_map = build_header_map(&headers);

    for name in REQUIRED_COLUMNS {
        if !header_map.contains_key(name) {
            return Err(PricingError::invalid_input(
                "csv",
                format!("missing required column `{name}`"),
            ));
        }
    }

    let mut rows = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because records() starts after the header row and CSV line
        // numbers are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map) {
            Ok((id, features)) => rows.push(DiamondRow { line, id, features }),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    if rows.is_empty() {
        return Err(PricingError::invalid_input(
            "csv",
            "no valid rows remain after validation",
        ));
    }

    Ok(IngestedBatch {
        rows,
        row_errors,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, schema validation will incorrectly
    // report a missing column.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn parse_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
) -> Result<(Option<String>, DiamondFeatures), String> {
    let weight = parse_f64(get_required(record, header_map, "weight")?, "weight")?;
    let length = parse_f64(get_required(record, header_map, "length")?, "length")?;
    let width = parse_f64(get_required(record, header_map, "width")?, "width")?;
    let depth = parse_f64(get_required(record, header_map, "depth")?, "depth")?;

    let quality = Quality::from_label(get_required(record, header_map, "quality")?)
        .map_err(|e| e.to_string())?;
    let color = Color::from_label(get_required(record, header_map, "color")?)
        .map_err(|e| e.to_string())?;
    let clarity = Clarity::from_label(get_required(record, header_map, "clarity")?)
        .map_err(|e| e.to_string())?;

    let id = get_optional(record, header_map, "id").map(str::to_string);

    Ok((
        id,
        DiamondFeatures {
            weight,
            length,
            width,
            depth,
            quality,
            color,
            clarity,
        },
    ))
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("missing required column `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("missing required value `{name}`"))
}

fn get_optional<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_f64(s: &str, name: &str) -> Result<f64, String> {
    let v = s
        .parse::<f64>()
        .map_err(|_| format!("invalid `{name}` value '{s}'"))?;
    if !v.is_finite() {
        return Err(format!("non-finite `{name}` value '{s}'"));
    }
    Ok(v)
}
