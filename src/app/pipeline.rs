//! The batch pipeline: load -> summarize -> charts -> report.
//!
//! Keeping this in one place (and out of the CLI layer) means the whole run
//! is testable without spawning a process, and the app layer only deals with
//! presentation.

use std::path::PathBuf;

use chrono::Duration;

use crate::data::generate_observations;
use crate::domain::{IssuerSummary, RunConfig};
use crate::error::AppError;
use crate::io::ingest::{IngestedData, load_observations};

/// File name of the report CSV inside the output directory.
pub const REPORT_FILE: &str = "credit_spread_report.csv";

/// File name used to persist a generated sample dataset.
pub const SAMPLE_FILE: &str = "cds_data_sample.csv";

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub summaries: Vec<IssuerSummary>,
    pub chart_paths: Vec<PathBuf>,
    pub report_path: PathBuf,
}

/// Execute the full pipeline and return the computed outputs.
///
/// The run either completes with all artifacts in place or fails with a
/// clear error; the report writer goes through a temp-and-rename so a failed
/// run never leaves a half-written report.
pub fn run(config: &RunConfig) -> Result<RunOutput, AppError> {
    // 1) Load (or generate) the observation sequence.
    let ingest = if config.sample {
        let start = chrono::Local::now().date_naive() - Duration::days(config.sample_days as i64);
        let observations = generate_observations(
            config.sample_seed,
            config.sample_issuers,
            config.sample_days,
            start,
        )?;
        crate::io::export::write_observations_csv(&config.out_dir.join(SAMPLE_FILE), &observations)?;
        IngestedData::from_observations(observations)?
    } else {
        load_observations(&config.input_path)?
    };

    // 2) Aggregate per issuer.
    let summaries = crate::stats::summarize(&ingest.observations);

    // 3) Render charts.
    let chart_paths = if config.charts {
        crate::chart::render_charts(
            &config.out_dir,
            &ingest.observations,
            &summaries,
            config.chart_width,
            config.chart_height,
        )?
    } else {
        Vec::new()
    };

    // 4) Write the report.
    let report_path = config.out_dir.join(REPORT_FILE);
    crate::io::export::write_report(&report_path, &summaries, &ingest.observations, &ingest.stats)?;

    Ok(RunOutput {
        ingest,
        summaries,
        chart_paths,
        report_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_out_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cds-pipeline-{tag}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn sample_run_produces_all_artifacts() {
        let out_dir = temp_out_dir("full");
        let config = RunConfig {
            input_path: PathBuf::from("unused.csv"),
            out_dir: out_dir.clone(),
            sample: true,
            sample_issuers: 3,
            sample_days: 45,
            sample_seed: 42,
            charts: true,
            chart_width: 480,
            chart_height: 320,
        };

        let run = run(&config).unwrap();
        assert_eq!(run.summaries.len(), 3);
        assert_eq!(run.chart_paths.len(), 3);
        assert!(run.report_path.exists());
        assert!(out_dir.join(SAMPLE_FILE).exists());
        for path in &run.chart_paths {
            assert!(path.exists());
        }

        fs::remove_dir_all(&out_dir).unwrap();
    }

    #[test]
    fn no_charts_run_skips_rendering() {
        let out_dir = temp_out_dir("nocharts");
        let config = RunConfig {
            input_path: PathBuf::from("unused.csv"),
            out_dir: out_dir.clone(),
            sample: true,
            sample_issuers: 2,
            sample_days: 10,
            sample_seed: 1,
            charts: false,
            chart_width: 480,
            chart_height: 320,
        };

        let run = run(&config).unwrap();
        assert!(run.chart_paths.is_empty());
        assert!(!out_dir.join(crate::chart::EVOLUTION_FILE).exists());
        assert!(run.report_path.exists());

        fs::remove_dir_all(&out_dir).unwrap();
    }

    #[test]
    fn missing_input_file_is_malformed_input() {
        let out_dir = temp_out_dir("missing");
        let config = RunConfig {
            input_path: out_dir.join("does-not-exist.csv"),
            out_dir: out_dir.clone(),
            sample: false,
            sample_issuers: 0,
            sample_days: 0,
            sample_seed: 0,
            charts: false,
            chart_width: 480,
            chart_height: 320,
        };

        let err = run(&config).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        // Aborted before any output was written.
        assert!(!out_dir.join(REPORT_FILE).exists());

        fs::remove_dir_all(&out_dir).unwrap();
    }
}
