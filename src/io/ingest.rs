//! CSV ingest and validation.
//!
//! This module is responsible for turning the raw spread-history CSV into a
//! clean, ordered sequence of `Observation`s that is safe to aggregate.
//!
//! Design goals:
//! - **Strict schema** for required fields (clear errors + exit code 2)
//! - **Abort on the first bad row**, naming the line and field (a report
//!   built on silently-dropped rows is worse than no report)
//! - **Deterministic behavior** (input order is preserved)
//! - **Separation of concerns**: no statistics here

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::{DatasetStats, Observation};
use crate::error::AppError;

/// Ingest output: validated observations in input order + dataset stats.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub observations: Vec<Observation>,
    pub stats: DatasetStats,
}

impl IngestedData {
    /// Wrap an already-validated observation sequence (e.g. the synthetic
    /// sample generator) without re-validating field presence.
    pub fn from_observations(observations: Vec<Observation>) -> Result<Self, AppError> {
        let stats = compute_stats(&observations).ok_or_else(|| {
            AppError::new(3, "No observations available (empty dataset).")
        })?;
        Ok(Self {
            observations,
            stats,
        })
    }
}

/// Load and validate the spread history CSV.
///
/// Required columns (header names are trimmed, BOM-stripped, and lowercased):
/// `date`, `issuer`, and `spread_bps` (`spread` is accepted as an alias).
pub fn load_observations(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::malformed_input(format!("Failed to open CSV '{}': {e}", path.display()))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::malformed_input(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut observations = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;

        let record = result
            .map_err(|e| AppError::malformed_input(format!("Line {line}: CSV parse error: {e}")))?;

        let observation = parse_row(&record, &header_map)
            .map_err(|msg| AppError::malformed_input(format!("Line {line}: {msg}")))?;
        observations.push(observation);
    }

    IngestedData::from_observations(observations).map_err(|_| {
        AppError::new(
            3,
            format!("No observations found in '{}'.", path.display()),
        )
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
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header (e.g. "﻿date"). If we don't strip it, schema validation
    // will incorrectly report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    if !header_map.contains_key("date") {
        return Err(AppError::malformed_input("Missing required column: `date`"));
    }
    if !header_map.contains_key("issuer") {
        return Err(AppError::malformed_input("Missing required column: `issuer`"));
    }
    if !header_map.contains_key("spread_bps") && !header_map.contains_key("spread") {
        return Err(AppError::malformed_input(
            "Missing required column: `spread_bps` (or `spread`)",
        ));
    }
    Ok(())
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<Observation, String> {
    let date = parse_date(get_required(record, header_map, "date")?)?;
    let issuer = get_required(record, header_map, "issuer")?.to_string();

    let spread_field = get_required(record, header_map, "spread_bps")
        .or_else(|_| get_required(record, header_map, "spread"))?;
    let spread_bps = parse_spread(spread_field)?;

    Ok(Observation {
        date,
        issuer,
        spread_bps,
    })
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    // We recommend ISO dates (`YYYY-MM-DD`), but spreadsheet exports often use
    // `DD/MM/YYYY` or `DD-MM-YYYY`. We accept a small set of common formats
    // to reduce friction while keeping parsing deterministic.
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, DD/MM/YYYY, DD-MM-YYYY, YYYY/MM/DD."
    ))
}

fn parse_spread(s: &str) -> Result<f64, String> {
    let v = s
        .parse::<f64>()
        .map_err(|_| format!("Invalid spread '{s}' (not a number)."))?;
    if !v.is_finite() {
        return Err(format!("Invalid spread '{s}' (not finite)."));
    }
    if v < 0.0 {
        return Err(format!("Invalid spread '{s}' (must be >= 0 bps)."));
    }
    Ok(v)
}

fn compute_stats(observations: &[Observation]) -> Option<DatasetStats> {
    let mut date_min: Option<NaiveDate> = None;
    let mut date_max: Option<NaiveDate> = None;
    let mut spread_min = f64::INFINITY;
    let mut spread_max = f64::NEG_INFINITY;
    let mut issuers = std::collections::BTreeSet::new();

    for obs in observations {
        date_min = Some(date_min.map_or(obs.date, |d| d.min(obs.date)));
        date_max = Some(date_max.map_or(obs.date, |d| d.max(obs.date)));
        spread_min = spread_min.min(obs.spread_bps);
        spread_max = spread_max.max(obs.spread_bps);
        issuers.insert(obs.issuer.as_str());
    }

    Some(DatasetStats {
        n_observations: observations.len(),
        n_issuers: issuers.len(),
        date_min: date_min?,
        date_max: date_max?,
        spread_min,
        spread_max,
    })
}
