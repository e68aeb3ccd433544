//! Aggregation shaping for dashboard views.
//!
//! The repository layer returns flat aggregate rows; these functions shape
//! them into the structures the dashboard endpoints serve. All of them
//! treat an empty record set as a valid zero-valued result, never an error.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Window sizing
// ---------------------------------------------------------------------------

/// Default trend window when the caller does not specify one.
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

/// Upper bound on the trend window. The dashboard offers 7/30/365-day
/// views; anything larger is clamped to keep responses bounded.
pub const MAX_WINDOW_DAYS: u32 = 365;

/// Clamp a requested window size to `1..=MAX_WINDOW_DAYS`.
pub fn clamp_window_days(days: Option<u32>) -> u32 {
    days.unwrap_or(DEFAULT_WINDOW_DAYS).clamp(1, MAX_WINDOW_DAYS)
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// The insect with the highest total across matching records.
///
/// `insect` is `None` (and `count` zero) when no records match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopInsect {
    pub insect: Option<String>,
    pub count: i64,
}

/// Aggregate view over a set of detection records.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    /// Number of matching records.
    pub total_records: i64,
    /// Sum of every count across all matching records.
    pub total_insect_count: i64,
    /// Per-label totals; labels whose total is zero are omitted.
    pub per_insect_totals: BTreeMap<String, i64>,
    pub top_insect: TopInsect,
}

/// Shape per-insect totals into a [`Summary`].
pub fn summarize(total_records: i64, totals: &[(String, i64)]) -> Summary {
    let per_insect_totals: BTreeMap<String, i64> = totals
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|(label, count)| (label.clone(), *count))
        .collect();

    Summary {
        total_records,
        total_insect_count: per_insect_totals.values().sum(),
        top_insect: top_insect(&per_insect_totals),
        per_insect_totals,
    }
}

/// The label with the maximum total. Ties break to the lexicographically
/// first label so results are reproducible.
pub fn top_insect(totals: &BTreeMap<String, i64>) -> TopInsect {
    let mut top: Option<(&str, i64)> = None;
    for (label, &count) in totals {
        // BTreeMap iterates in label order, so strictly-greater keeps the
        // first label on ties.
        if top.map_or(true, |(_, best)| count > best) {
            top = Some((label, count));
        }
    }
    match top {
        Some((label, count)) => TopInsect {
            insect: Some(label.to_string()),
            count,
        },
        None => TopInsect {
            insect: None,
            count: 0,
        },
    }
}

// ---------------------------------------------------------------------------
// Time series
// ---------------------------------------------------------------------------

/// Daily per-insect counts over a fixed date axis.
///
/// Every label has exactly `dates.len()` entries; days without records are
/// zeros, not gaps.
#[derive(Debug, Clone, Serialize)]
pub struct TimeSeries {
    pub dates: Vec<NaiveDate>,
    pub per_insect: BTreeMap<String, Vec<i64>>,
}

/// Build a dense time series from `(day, label, total)` aggregate rows.
///
/// The axis spans `days` calendar dates ending at `end` inclusive. Rows
/// outside the axis are ignored (the repository query already bounds them,
/// but clock skew between query and shaping must not panic).
pub fn build_time_series(end: NaiveDate, days: u32, rows: &[(NaiveDate, String, i64)]) -> TimeSeries {
    let start = end - Days::new(u64::from(days - 1));
    let dates: Vec<NaiveDate> = (0..days)
        .map(|offset| start + Days::new(u64::from(offset)))
        .collect();

    let mut per_insect: BTreeMap<String, Vec<i64>> = BTreeMap::new();
    for (_, label, _) in rows {
        per_insect
            .entry(label.clone())
            .or_insert_with(|| vec![0; days as usize]);
    }

    for (day, label, count) in rows {
        if *day < start || *day > end {
            continue;
        }
        let index = (*day - start).num_days() as usize;
        if let Some(series) = per_insect.get_mut(label) {
            series[index] += count;
        }
    }

    TimeSeries { dates, per_insect }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    // -- Window clamping ---------------------------------------------------

    #[test]
    fn window_defaults_to_seven_days() {
        assert_eq!(clamp_window_days(None), 7);
    }

    #[test]
    fn window_is_clamped_to_bounds() {
        assert_eq!(clamp_window_days(Some(0)), 1);
        assert_eq!(clamp_window_days(Some(30)), 30);
        assert_eq!(clamp_window_days(Some(100_000)), MAX_WINDOW_DAYS);
    }

    // -- Summary -----------------------------------------------------------

    #[test]
    fn summarize_empty_set_yields_zeroes() {
        let summary = summarize(0, &[]);
        assert_eq!(summary.total_records, 0);
        assert_eq!(summary.total_insect_count, 0);
        assert!(summary.per_insect_totals.is_empty());
        assert_eq!(summary.top_insect.insect, None);
        assert_eq!(summary.top_insect.count, 0);
    }

    #[test]
    fn summarize_sums_and_ranks() {
        let totals = vec![
            ("aphids".to_string(), 3),
            ("thrips".to_string(), 7),
            ("beetle".to_string(), 2),
        ];
        let summary = summarize(4, &totals);
        assert_eq!(summary.total_records, 4);
        assert_eq!(summary.total_insect_count, 12);
        assert_eq!(summary.top_insect.insect.as_deref(), Some("thrips"));
        assert_eq!(summary.top_insect.count, 7);
    }

    #[test]
    fn summarize_omits_zero_totals() {
        let totals = vec![("aphids".to_string(), 0), ("thrips".to_string(), 1)];
        let summary = summarize(1, &totals);
        assert!(!summary.per_insect_totals.contains_key("aphids"));
    }

    #[test]
    fn top_insect_ties_break_lexicographically() {
        let totals = BTreeMap::from([
            ("thrips".to_string(), 5),
            ("aphids".to_string(), 5),
        ]);
        let top = top_insect(&totals);
        assert_eq!(top.insect.as_deref(), Some("aphids"));
        assert_eq!(top.count, 5);
    }

    // -- Time series -------------------------------------------------------

    #[test]
    fn axis_always_has_exactly_requested_days() {
        let series = build_time_series(day("2026-08-06"), 7, &[]);
        assert_eq!(series.dates.len(), 7);
        assert_eq!(series.dates[0], day("2026-07-31"));
        assert_eq!(series.dates[6], day("2026-08-06"));
        assert!(series.per_insect.is_empty());
    }

    #[test]
    fn every_label_is_dense_across_the_axis() {
        let rows = vec![
            (day("2026-08-04"), "aphids".to_string(), 3),
            (day("2026-08-06"), "thrips".to_string(), 2),
        ];
        let series = build_time_series(day("2026-08-06"), 7, &rows);

        assert_eq!(series.per_insect.len(), 2);
        for counts in series.per_insect.values() {
            assert_eq!(counts.len(), 7);
        }
        assert_eq!(series.per_insect["aphids"][5], 3);
        assert_eq!(series.per_insect["aphids"][6], 0);
        assert_eq!(series.per_insect["thrips"][6], 2);
    }

    #[test]
    fn same_day_rows_accumulate() {
        let rows = vec![
            (day("2026-08-06"), "aphids".to_string(), 1),
            (day("2026-08-06"), "aphids".to_string(), 4),
        ];
        let series = build_time_series(day("2026-08-06"), 1, &rows);
        assert_eq!(series.per_insect["aphids"], vec![5]);
    }

    #[test]
    fn rows_outside_the_axis_are_ignored() {
        let rows = vec![(day("2026-07-01"), "aphids".to_string(), 9)];
        let series = build_time_series(day("2026-08-06"), 7, &rows);
        assert_eq!(series.per_insect["aphids"], vec![0; 7]);
    }
}
