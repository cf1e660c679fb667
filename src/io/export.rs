//! Report and dataset exports.
//!
//! The report is a single CSV with three sections (per-issuer summary, raw
//! observations, run summary), mirroring the dashboard layout: it is meant to
//! be opened directly in a spreadsheet.
//!
//! The file is written to a temporary sibling path and renamed into place on
//! success, so a failed run never leaves a half-written report behind.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::domain::{DatasetStats, IssuerSummary, Observation};
use crate::error::AppError;

/// Write the multi-section report CSV.
pub fn write_report(
    path: &Path,
    summaries: &[IssuerSummary],
    observations: &[Observation],
    stats: &DatasetStats,
) -> Result<(), AppError> {
    let tmp = tmp_path(path);

    let result = write_report_inner(&tmp, summaries, observations, stats).and_then(|()| {
        fs::rename(&tmp, path).map_err(|e| {
            AppError::output_write(format!(
                "Failed to move report into place at '{}': {e}",
                path.display()
            ))
        })
    });

    if result.is_err() {
        // Best-effort cleanup; the original error is the one worth surfacing.
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_report_inner(
    tmp: &Path,
    summaries: &[IssuerSummary],
    observations: &[Observation],
    stats: &DatasetStats,
) -> Result<(), AppError> {
    let file = File::create(tmp).map_err(|e| {
        AppError::output_write(format!("Failed to create report '{}': {e}", tmp.display()))
    })?;
    let mut out = BufWriter::new(file);

    write_summary_section(&mut out, summaries)
        .and_then(|()| write_observations_section(&mut out, observations))
        .and_then(|()| write_run_summary_section(&mut out, summaries, stats))
        .and_then(|()| out.flush())
        .map_err(|e| AppError::output_write(format!("Failed to write report: {e}")))
}

fn write_summary_section(out: &mut impl Write, summaries: &[IssuerSummary]) -> std::io::Result<()> {
    writeln!(out, "== issuer summary ==")?;
    writeln!(
        out,
        "issuer,current_spread_bps,mean_spread_bps,min_spread_bps,max_spread_bps,volatility_bps,change_1m_bps"
    )?;
    for s in summaries {
        writeln!(
            out,
            "{},{:.2},{:.2},{:.2},{:.2},{:.2},{}",
            s.issuer,
            s.current_spread,
            s.mean_spread,
            s.min_spread,
            s.max_spread,
            s.volatility,
            s.change_1m.map(|v| format!("{v:.2}")).unwrap_or_default(),
        )?;
    }
    Ok(())
}

fn write_observations_section(out: &mut impl Write, observations: &[Observation]) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "== observations ==")?;
    writeln!(out, "date,issuer,spread_bps")?;
    for obs in observations {
        writeln!(out, "{},{},{:.2}", obs.date, obs.issuer, obs.spread_bps)?;
    }
    Ok(())
}

fn write_run_summary_section(
    out: &mut impl Write,
    summaries: &[IssuerSummary],
    stats: &DatasetStats,
) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "== run summary ==")?;
    writeln!(out, "metric,value")?;
    writeln!(out, "issuers,{}", stats.n_issuers)?;
    writeln!(out, "observations,{}", stats.n_observations)?;
    writeln!(out, "period,{} to {}", stats.date_min, stats.date_max)?;
    writeln!(out, "market mean spread (bps),{:.2}", mean(summaries.iter().map(|s| s.mean_spread)))?;
    writeln!(out, "mean volatility (bps),{:.2}", mean(summaries.iter().map(|s| s.volatility)))?;
    writeln!(
        out,
        "generated,{}",
        chrono::Local::now().format("%Y-%m-%d %H:%M")
    )?;
    Ok(())
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut n = 0usize;
    for v in values {
        sum += v;
        n += 1;
    }
    if n == 0 { 0.0 } else { sum / n as f64 }
}

/// Write a plain observations CSV (used to persist the generated sample
/// dataset so it can be inspected and rerun through the normal loader).
pub fn write_observations_csv(path: &Path, observations: &[Observation]) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::output_write(format!("Failed to create CSV '{}': {e}", path.display()))
    })?;
    let mut out = BufWriter::new(file);

    write_observation_rows(&mut out, observations)
        .map_err(|e| AppError::output_write(format!("Failed to write CSV '{}': {e}", path.display())))
}

fn write_observation_rows(out: &mut impl Write, observations: &[Observation]) -> std::io::Result<()> {
    writeln!(out, "date,issuer,spread_bps")?;
    for obs in observations {
        writeln!(out, "{},{},{:.2}", obs.date, obs.issuer, obs.spread_bps)?;
    }
    out.flush()
}
