//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during aggregation
//! - exported to the CSV report
//! - reloaded later for comparisons across runs

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single CDS spread observation as loaded from the input file.
///
/// Immutable once loaded. Duplicate `(date, issuer)` pairs are allowed and
/// treated as independent data points by the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub issuer: String,
    /// CDS premium in basis points. Non-negative by the loader's contract.
    pub spread_bps: f64,
}

/// Per-issuer summary statistics, one per distinct issuer in the input.
///
/// All values are in basis points and already rounded to 2 decimal places;
/// downstream consumers (report writer, charts) never recompute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuerSummary {
    pub issuer: String,
    /// Spread of the chronologically latest observation. Ties on the maximal
    /// date resolve to the last-occurring observation in input order.
    pub current_spread: f64,
    pub mean_spread: f64,
    pub min_spread: f64,
    pub max_spread: f64,
    /// Sample standard deviation (divide by N-1) of the issuer's spreads.
    /// Groups with fewer than 2 observations get the sentinel `0.0`.
    pub volatility: f64,
    /// `current_spread` minus the spread observed at the closest date at or
    /// before `current date - 30 days`. `None` when no such observation
    /// exists (rendered as "n/a", never coerced to zero).
    pub change_1m: Option<f64>,
}

/// Aggregate facts about the loaded dataset, used by the terminal output and
/// the report's run-summary section.
#[derive(Debug, Clone)]
pub struct DatasetStats {
    pub n_observations: usize,
    pub n_issuers: usize,
    pub date_min: NaiveDate,
    pub date_max: NaiveDate,
    pub spread_min: f64,
    pub spread_max: f64,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags plus `.env`/environment defaults.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_path: PathBuf,
    pub out_dir: PathBuf,

    /// Generate a synthetic dataset instead of reading `input_path`.
    pub sample: bool,
    pub sample_issuers: usize,
    pub sample_days: usize,
    pub sample_seed: u64,

    pub charts: bool,
    pub chart_width: u32,
    pub chart_height: u32,
}
