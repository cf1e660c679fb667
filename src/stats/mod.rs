//! Per-issuer statistical aggregation (the core of the tool).
//!
//! `summarize` is a pure function over its input: no I/O, no hidden state,
//! same input always yields the same output. Policies that the rest of the
//! pipeline relies on are fixed here, not left to incidental iteration order:
//!
//! - groups are sorted by date with a **stable** sort, so ties on the maximal
//!   date resolve to the last-occurring observation in input order
//! - volatility is the **sample** standard deviation (divide by N-1), with a
//!   `0.0` sentinel for groups of fewer than 2 observations
//! - the 1-month change looks back to the closest observation at or before
//!   `current date - 30 days`, and is absent (`None`) when none exists
//! - all emitted values are rounded to 2 decimal places
//! - output is ordered alphabetically by issuer for report stability

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};

use crate::domain::{IssuerSummary, Observation};

/// Look-back window for the 1-month change, in calendar days.
const CHANGE_1M_DAYS: i64 = 30;

/// Group observations by issuer and compute one `IssuerSummary` per group.
///
/// Input does not need to be pre-sorted. An empty input yields an empty
/// output; a single-observation issuer yields the volatility sentinel and an
/// absent 1-month change, never an error.
pub fn summarize(observations: &[Observation]) -> Vec<IssuerSummary> {
    // BTreeMap keys give us the alphabetical output order for free; pushing
    // in input order preserves the tie-break information for the stable sort.
    let mut groups: BTreeMap<&str, Vec<&Observation>> = BTreeMap::new();
    for obs in observations {
        groups.entry(obs.issuer.as_str()).or_default().push(obs);
    }

    groups
        .into_iter()
        .map(|(issuer, mut group)| {
            group.sort_by_key(|obs| obs.date);
            summarize_group(issuer, &group)
        })
        .collect()
}

/// Shape observations into one date-ordered `(date, spread)` series per
/// issuer, alphabetically keyed. This is the same partition `summarize` uses;
/// the evolution chart consumes it directly.
pub fn issuer_series(observations: &[Observation]) -> BTreeMap<String, Vec<(NaiveDate, f64)>> {
    let mut series: BTreeMap<String, Vec<(NaiveDate, f64)>> = BTreeMap::new();
    for obs in observations {
        series
            .entry(obs.issuer.clone())
            .or_default()
            .push((obs.date, obs.spread_bps));
    }
    for points in series.values_mut() {
        points.sort_by_key(|(date, _)| *date);
    }
    series
}

fn summarize_group(issuer: &str, group: &[&Observation]) -> IssuerSummary {
    debug_assert!(!group.is_empty(), "grouping never yields an empty group");

    // Stable sort: the last element is the latest date, and within equal
    // maximal dates the last-occurring observation in input order.
    let latest = group[group.len() - 1];
    let current_spread = latest.spread_bps;

    let n = group.len() as f64;
    let sum: f64 = group.iter().map(|obs| obs.spread_bps).sum();
    let mean = sum / n;

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for obs in group {
        min = min.min(obs.spread_bps);
        max = max.max(obs.spread_bps);
    }

    let change_1m = change_1m(group, latest).map(|prior| round_bps(current_spread - prior));

    IssuerSummary {
        issuer: issuer.to_string(),
        current_spread: round_bps(current_spread),
        mean_spread: round_bps(mean),
        min_spread: round_bps(min),
        max_spread: round_bps(max),
        volatility: round_bps(sample_std_dev(group, mean)),
        change_1m,
    }
}

/// Sample standard deviation of the group's spreads, `0.0` sentinel when the
/// group has fewer than 2 observations.
fn sample_std_dev(group: &[&Observation], mean: f64) -> f64 {
    if group.len() < 2 {
        return 0.0;
    }
    let sq_sum: f64 = group
        .iter()
        .map(|obs| {
            let d = obs.spread_bps - mean;
            d * d
        })
        .sum();
    (sq_sum / (group.len() as f64 - 1.0)).sqrt()
}

/// Spread of the reference observation for the 1-month change: the greatest
/// date at or before `latest.date - 30 days`, last-in-input-order on ties.
fn change_1m(group: &[&Observation], latest: &Observation) -> Option<f64> {
    let cutoff = latest.date - Duration::days(CHANGE_1M_DAYS);
    // Reverse scan of the date-sorted group finds the greatest qualifying
    // date first, and within equal dates the last-occurring observation.
    group
        .iter()
        .rev()
        .find(|obs| obs.date <= cutoff)
        .map(|obs| obs.spread_bps)
}

/// Fixed rounding policy for all emitted bps values: 2 decimal places.
fn round_bps(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn obs(date: (i32, u32, u32), issuer: &str, spread: f64) -> Observation {
        Observation {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            issuer: issuer.to_string(),
            spread_bps: spread,
        }
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(summarize(&[]).is_empty());
    }

    #[test]
    fn one_summary_per_distinct_issuer() {
        let observations = vec![
            obs((2026, 1, 1), "BNP", 80.0),
            obs((2026, 1, 2), "AXA", 120.0),
            obs((2026, 1, 3), "BNP", 85.0),
            obs((2026, 1, 4), "ENGIE", 95.0),
        ];
        let summaries = summarize(&observations);
        assert_eq!(summaries.len(), 3);
    }

    #[test]
    fn output_is_alphabetical_regardless_of_input_order() {
        let observations = vec![
            obs((2026, 1, 1), "ENGIE", 95.0),
            obs((2026, 1, 1), "AXA", 120.0),
            obs((2026, 1, 1), "BNP", 80.0),
        ];
        let summaries = summarize(&observations);
        let issuers: Vec<&str> = summaries.iter().map(|s| s.issuer.as_str()).collect();
        assert_eq!(issuers, vec!["AXA", "BNP", "ENGIE"]);
    }

    #[test]
    fn two_point_scenario_matches_hand_computation() {
        // (2026-01-01, 80.0), (2026-02-01, 82.5): the prior observation sits
        // exactly 31 days back, so it qualifies for the 1-month change.
        let observations = vec![
            obs((2026, 1, 1), "BNP", 80.0),
            obs((2026, 2, 1), "BNP", 82.5),
        ];
        let summaries = summarize(&observations);
        assert_eq!(summaries.len(), 1);
        let s = &summaries[0];
        assert_eq!(s.current_spread, 82.5);
        assert_eq!(s.mean_spread, 81.25);
        assert_eq!(s.min_spread, 80.0);
        assert_eq!(s.max_spread, 82.5);
        assert_eq!(s.change_1m, Some(2.5));
        // Sample std dev of {80.0, 82.5} is 2.5/sqrt(2) ~ 1.77 after rounding.
        assert_eq!(s.volatility, 1.77);
    }

    #[test]
    fn min_mean_max_ordering_holds() {
        let observations = vec![
            obs((2026, 1, 1), "BNP", 80.0),
            obs((2026, 1, 2), "BNP", 95.5),
            obs((2026, 1, 3), "BNP", 72.25),
            obs((2026, 1, 4), "BNP", 88.0),
        ];
        let s = &summarize(&observations)[0];
        assert!(s.min_spread <= s.mean_spread);
        assert!(s.mean_spread <= s.max_spread);
    }

    #[test]
    fn single_observation_uses_sentinels() {
        let observations = vec![
            obs((2026, 1, 1), "AXA", 120.0),
            obs((2026, 1, 1), "BNP", 80.0),
        ];
        let summaries = summarize(&observations);
        assert_eq!(summaries.len(), 2);
        for s in &summaries {
            assert_eq!(s.volatility, 0.0);
            assert_eq!(s.change_1m, None);
        }
    }

    #[test]
    fn current_spread_tie_breaks_on_input_order() {
        // Two observations share the maximal date; the later one in input
        // order wins deterministically.
        let observations = vec![
            obs((2026, 1, 1), "BNP", 80.0),
            obs((2026, 3, 1), "BNP", 90.0),
            obs((2026, 3, 1), "BNP", 91.5),
        ];
        let s = &summarize(&observations)[0];
        assert_eq!(s.current_spread, 91.5);
    }

    #[test]
    fn change_1m_picks_closest_at_or_before_cutoff() {
        // Cutoff is 2026-03-15 - 30d = 2026-02-13; the 2026-02-10 observation
        // is closer to the cutoff than the January one.
        let observations = vec![
            obs((2026, 1, 5), "BNP", 70.0),
            obs((2026, 2, 10), "BNP", 75.0),
            obs((2026, 3, 1), "BNP", 82.0),
            obs((2026, 3, 15), "BNP", 85.0),
        ];
        let s = &summarize(&observations)[0];
        assert_eq!(s.change_1m, Some(10.0));
    }

    #[test]
    fn change_1m_absent_when_history_too_short() {
        let observations = vec![
            obs((2026, 3, 1), "BNP", 82.0),
            obs((2026, 3, 15), "BNP", 85.0),
        ];
        let s = &summarize(&observations)[0];
        assert_eq!(s.change_1m, None);
    }

    #[test]
    fn duplicate_date_issuer_pairs_are_independent_points() {
        let observations = vec![
            obs((2026, 1, 1), "BNP", 80.0),
            obs((2026, 1, 1), "BNP", 80.0),
        ];
        let s = &summarize(&observations)[0];
        assert_eq!(s.mean_spread, 80.0);
        assert_eq!(s.volatility, 0.0);
    }

    #[test]
    fn issuer_series_partitions_and_date_sorts() {
        let observations = vec![
            obs((2026, 2, 1), "BNP", 82.5),
            obs((2026, 1, 15), "AXA", 130.0),
            obs((2026, 1, 1), "BNP", 80.0),
        ];
        let series = issuer_series(&observations);
        assert_eq!(series.len(), 2);
        assert_eq!(
            series["BNP"],
            vec![
                (NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(), 80.0),
                (NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(), 82.5),
            ]
        );
    }

    #[test]
    fn summarize_is_idempotent() {
        let observations = vec![
            obs((2026, 1, 1), "BNP", 80.0),
            obs((2026, 2, 1), "BNP", 82.5),
            obs((2026, 1, 15), "AXA", 130.0),
        ];
        assert_eq!(summarize(&observations), summarize(&observations));
    }

    #[test]
    fn emitted_values_are_rounded_to_two_decimals() {
        let observations = vec![
            obs((2026, 1, 1), "BNP", 80.111),
            obs((2026, 2, 1), "BNP", 82.555),
        ];
        let s = &summarize(&observations)[0];
        for v in [s.current_spread, s.mean_spread, s.min_spread, s.max_spread, s.volatility] {
            assert_eq!((v * 100.0).round() / 100.0, v);
        }
    }
}
