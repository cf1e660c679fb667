//! PNG chart rendering for the dashboard.
//!
//! Three artifacts per run:
//!
//! - `spread_evolution.png`: one line series per issuer over time
//! - `spread_comparison.png`: one bar per issuer, current spread
//! - `spread_volatility.png`: one bar per issuer, spread volatility
//!
//! The charts are intentionally text-free: with Plotters' font backends
//! disabled (see Cargo.toml) there is no glyph rasterizer available, so we
//! draw mesh lines and series only. Data correctness lives in the report;
//! these images are the visual companion.

use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::domain::{IssuerSummary, Observation};
use crate::error::AppError;
use crate::stats::issuer_series;

pub const EVOLUTION_FILE: &str = "spread_evolution.png";
pub const COMPARISON_FILE: &str = "spread_comparison.png";
pub const VOLATILITY_FILE: &str = "spread_volatility.png";

/// Render the three dashboard charts into `out_dir`.
///
/// Returns the written paths in a stable order (evolution, comparison,
/// volatility). Any drawing or encoding failure is exit code 4.
pub fn render_charts(
    out_dir: &Path,
    observations: &[Observation],
    summaries: &[IssuerSummary],
    width: u32,
    height: u32,
) -> Result<Vec<PathBuf>, AppError> {
    let evolution = out_dir.join(EVOLUTION_FILE);
    draw_evolution(&evolution, observations, width, height)
        .map_err(|e| AppError::new(4, format!("Failed to render '{}': {e}", evolution.display())))?;

    let comparison = out_dir.join(COMPARISON_FILE);
    let current: Vec<(&str, f64)> = summaries
        .iter()
        .map(|s| (s.issuer.as_str(), s.current_spread))
        .collect();
    draw_bars(&comparison, &current, width, height, BLUE.mix(0.8))
        .map_err(|e| AppError::new(4, format!("Failed to render '{}': {e}", comparison.display())))?;

    let volatility = out_dir.join(VOLATILITY_FILE);
    let vols: Vec<(&str, f64)> = summaries
        .iter()
        .map(|s| (s.issuer.as_str(), s.volatility))
        .collect();
    draw_bars(&volatility, &vols, width, height, RED.mix(0.7))
        .map_err(|e| AppError::new(4, format!("Failed to render '{}': {e}", volatility.display())))?;

    Ok(vec![evolution, comparison, volatility])
}

fn draw_evolution(
    path: &Path,
    observations: &[Observation],
    width: u32,
    height: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let series = issuer_series(observations);

    let mut date_min = None;
    let mut date_max = None;
    let mut y_max = f64::NEG_INFINITY;
    for points in series.values() {
        for &(date, spread) in points {
            date_min = Some(date_min.map_or(date, |d: chrono::NaiveDate| d.min(date)));
            date_max = Some(date_max.map_or(date, |d: chrono::NaiveDate| d.max(date)));
            y_max = y_max.max(spread);
        }
    }
    let Some(date_min) = date_min else {
        return Err("No observations to plot.".into());
    };
    let mut date_max = date_max.unwrap_or(date_min);
    if date_max == date_min {
        // A single-day dataset still needs a non-degenerate x range.
        date_max = date_max + chrono::Duration::days(1);
    }
    let y_max = pad_upper(y_max);

    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(12)
        .build_cartesian_2d(date_min..date_max, 0.0..y_max)?;

    chart
        .configure_mesh()
        .light_line_style(&RGBColor(230, 230, 230))
        .bold_line_style(&RGBColor(200, 200, 200))
        .draw()?;

    for (idx, points) in series.values().enumerate() {
        let color = Palette99::pick(idx);
        chart.draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?;
        // Markers make single-point issuers visible.
        chart.draw_series(
            points
                .iter()
                .map(|&(date, spread)| Circle::new((date, spread), 3, color.filled())),
        )?;
    }

    root.present()?;
    Ok(())
}

/// Horizontal bar chart: one band per issuer, bar length = value.
fn draw_bars(
    path: &Path,
    values: &[(&str, f64)],
    width: u32,
    height: u32,
    color: RGBAColor,
) -> Result<(), Box<dyn std::error::Error>> {
    if values.is_empty() {
        return Err("No issuers to plot.".into());
    }

    let x_max = pad_upper(values.iter().map(|&(_, v)| v).fold(0.0, f64::max));

    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(12)
        .build_cartesian_2d(0.0..x_max, 0.0..values.len() as f64)?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .light_line_style(&RGBColor(230, 230, 230))
        .bold_line_style(&RGBColor(200, 200, 200))
        .draw()?;

    let style = color.filled();
    chart.draw_series(values.iter().enumerate().map(|(idx, &(_, value))| {
        let y0 = idx as f64 + 0.15;
        let y1 = idx as f64 + 0.85;
        Rectangle::new([(0.0, y0), (value, y1)], style)
    }))?;

    root.present()?;
    Ok(())
}

/// Pad the upper bound so the largest value doesn't sit on the frame; keeps a
/// sane range for all-zero data (e.g. volatility of single-point issuers).
fn pad_upper(v: f64) -> f64 {
    if !v.is_finite() || v <= 0.0 { 1.0 } else { v * 1.08 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;

    fn obs(date: (i32, u32, u32), issuer: &str, spread: f64) -> Observation {
        Observation {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            issuer: issuer.to_string(),
            spread_bps: spread,
        }
    }

    #[test]
    fn renders_all_three_artifacts() {
        let observations = vec![
            obs((2026, 1, 1), "BNP", 80.0),
            obs((2026, 2, 1), "BNP", 82.5),
            obs((2026, 1, 15), "AXA", 130.0),
        ];
        let summaries = crate::stats::summarize(&observations);

        let dir = std::env::temp_dir().join(format!("cds-charts-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let paths = render_charts(&dir, &observations, &summaries, 640, 480).unwrap();
        assert_eq!(paths.len(), 3);
        for path in &paths {
            let len = fs::metadata(path).unwrap().len();
            assert!(len > 0, "empty chart file: {}", path.display());
        }

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn single_day_single_issuer_still_renders() {
        let observations = vec![obs((2026, 1, 1), "BNP", 80.0)];
        let summaries = crate::stats::summarize(&observations);

        let dir = std::env::temp_dir().join(format!("cds-charts-one-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        render_charts(&dir, &observations, &summaries, 320, 240).unwrap();

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn pad_upper_guards_zero_ranges() {
        assert_eq!(pad_upper(0.0), 1.0);
        assert!(pad_upper(100.0) > 100.0);
    }
}
