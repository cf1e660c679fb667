//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the aggregation core stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{DatasetStats, IssuerSummary};

/// Format the run header (dataset stats).
pub fn format_run_summary(stats: &DatasetStats) -> String {
    let mut out = String::new();

    out.push_str("=== cds - Credit Spread Tracker ===\n");
    out.push_str(&format!(
        "Observations: {} | Issuers: {}\n",
        stats.n_observations, stats.n_issuers
    ));
    out.push_str(&format!(
        "Period: {} to {}\n",
        stats.date_min, stats.date_max
    ));
    out.push_str(&format!(
        "Spread range: [{:.2}, {:.2}]bp\n",
        stats.spread_min, stats.spread_max
    ));

    out
}

/// Format the per-issuer summary table.
pub fn format_summary_table(summaries: &[IssuerSummary]) -> String {
    let mut out = String::new();

    out.push_str("Per-issuer summary (bps):\n");
    out.push_str(
        format!(
            "{:<24} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}\n",
            "issuer", "current", "mean", "min", "max", "vol", "chg 1m"
        )
        .trim_end(),
    );
    out.push('\n');

    out.push_str(
        format!(
            "{:-<24} {:-<10} {:-<10} {:-<10} {:-<10} {:-<10} {:-<10}\n",
            "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for s in summaries {
        out.push_str(
            format!(
                "{:<24} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10}\n",
                truncate(&s.issuer, 24),
                s.current_spread,
                s.mean_spread,
                s.min_spread,
                s.max_spread,
                s.volatility,
                fmt_change(s.change_1m),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn fmt_change(change: Option<f64>) -> String {
    match change {
        Some(v) => format!("{v:+.2}"),
        None => "n/a".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
