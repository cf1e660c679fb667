//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments (plus `.env`/environment defaults)
//! - runs the load -> summarize -> charts -> report pipeline
//! - prints progress and the formatted summary table

use std::path::PathBuf;

use clap::Parser;

use crate::domain::RunConfig;
use crate::error::AppError;

pub mod pipeline;

/// Default input file name when neither `--input` nor `CDS_INPUT_FILE` is set.
const DEFAULT_INPUT: &str = "cds_data.csv";

/// Entry point for the `cds` binary.
pub fn run() -> Result<(), AppError> {
    // Load `.env` if present; missing files are fine.
    dotenvy::dotenv().ok();

    let cli = crate::cli::Cli::parse();
    let config = run_config_from_cli(&cli);

    let run = pipeline::run(&config)?;

    println!("{}", crate::report::format_run_summary(&run.ingest.stats));
    println!("{}", crate::report::format_summary_table(&run.summaries));

    for path in &run.chart_paths {
        println!("Chart written: {}", path.display());
    }
    println!("Report written: {}", run.report_path.display());

    Ok(())
}

pub fn run_config_from_cli(cli: &crate::cli::Cli) -> RunConfig {
    let input_path = cli
        .input
        .clone()
        .or_else(|| std::env::var("CDS_INPUT_FILE").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));

    let out_dir = cli
        .out_dir
        .clone()
        .or_else(|| std::env::var("CDS_OUTPUT_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));

    RunConfig {
        input_path,
        out_dir,
        sample: cli.sample,
        sample_issuers: cli.sample_issuers,
        sample_days: cli.sample_days,
        sample_seed: cli.seed,
        charts: !cli.no_charts,
        chart_width: cli.chart_width,
        chart_height: cli.chart_height,
    }
}
