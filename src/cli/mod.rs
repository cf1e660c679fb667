//! Command-line parsing for the CDS spread tracker.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! aggregation/reporting code. There are no subcommands: the tool is a
//! one-shot batch run, and a bare `cds` invocation does the whole pipeline
//! with defaults (input path and output directory can also come from
//! `CDS_INPUT_FILE` / `CDS_OUTPUT_DIR`, loaded via `.env`).

use std::path::PathBuf;

use clap::Parser;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "cds",
    version,
    about = "CDS spread tracker: per-issuer statistics, charts, and a spreadsheet report"
)]
pub struct Cli {
    /// Input CSV with columns: date, issuer, spread_bps.
    #[arg(short = 'i', long)]
    pub input: Option<PathBuf>,

    /// Directory for the report and chart files.
    #[arg(short = 'o', long)]
    pub out_dir: Option<PathBuf>,

    /// Generate a synthetic sample dataset instead of reading the input file.
    ///
    /// The generated data is also written to `cds_data_sample.csv` in the
    /// output directory so it can be inspected and rerun.
    #[arg(long)]
    pub sample: bool,

    /// Number of issuers in the generated sample.
    #[arg(long, default_value_t = 5)]
    pub sample_issuers: usize,

    /// Number of daily observations per issuer in the generated sample.
    #[arg(long, default_value_t = 90)]
    pub sample_days: usize,

    /// Random seed for sample generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Skip chart rendering (report only).
    #[arg(long)]
    pub no_charts: bool,

    /// Chart width in pixels.
    #[arg(long, default_value_t = 1200)]
    pub chart_width: u32,

    /// Chart height in pixels.
    #[arg(long, default_value_t = 700)]
    pub chart_height: u32,
}
