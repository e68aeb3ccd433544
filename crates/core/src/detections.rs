//! Detection payload normalization.
//!
//! Field devices have shipped three payload shapes over time: a single
//! `insect`/`count` pair, a `detections` map of label to count, and a
//! fielded `raw_meta` map whose values arrive as stringified numbers. All
//! of them funnel through [`normalize`] into one canonical map, so no other
//! component ever sees a legacy shape.
//!
//! Normalization is deliberately permissive: field telemetry is noisy, and
//! a bad count must degrade to zero rather than reject the submission.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Canonical detections: label to positive count, ordered by label.
///
/// `BTreeMap` ordering makes [`summary`] and downstream iteration
/// deterministic.
pub type DetectionMap = BTreeMap<String, i64>;

/// A detection payload as submitted by a device, before normalization.
#[derive(Debug, Clone)]
pub enum RawDetections {
    /// Legacy single-insect shape: `{"insect": "aphids", "count": 3}`.
    Single { label: String, count: Value },
    /// Map shape: `{"aphids": 3, "thrips": "2"}`. Values may be integers,
    /// floats, or stringified numbers (the `raw_meta` fielded shape).
    Map(Map<String, Value>),
}

/// Normalize a raw payload into the canonical detections map.
///
/// Per entry: integer coercion, else float coercion truncated toward zero,
/// else zero. Labels are trimmed; entries that end up with an empty label or
/// a count of zero or less are dropped. Never fails.
///
/// Idempotent: applying `normalize` to its own canonical output (wrapped
/// back into a map) returns the same map.
pub fn normalize(raw: &RawDetections) -> DetectionMap {
    let mut canonical = DetectionMap::new();

    let mut add = |label: &str, count: i64| {
        let label = label.trim();
        if !label.is_empty() && count > 0 {
            *canonical.entry(label.to_string()).or_insert(0) += count;
        }
    };

    match raw {
        RawDetections::Single { label, count } => add(label, coerce_count(count)),
        RawDetections::Map(map) => {
            for (label, count) in map {
                add(label, coerce_count(count));
            }
        }
    }

    canonical
}

/// Sum of all counts in a canonical map.
pub fn total(detections: &DetectionMap) -> i64 {
    detections.values().sum()
}

/// Legacy `insect` summary string: `"label:count"` entries joined with
/// commas, sorted by label.
///
/// Dashboards written against the old flat schema still read this field;
/// it is always derived, never stored.
pub fn summary(detections: &DetectionMap) -> String {
    detections
        .iter()
        .map(|(label, count)| format!("{label}:{count}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Coerce a JSON value to an integer count.
///
/// Integers pass through; floats truncate toward zero; strings are parsed
/// as an integer, then as a float. Everything else, including unparsable
/// strings, coerces to zero.
fn coerce_count(value: &Value) -> i64 {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i
            } else {
                n.as_f64().map(|f| f as i64).unwrap_or(0)
            }
        }
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                i
            } else if let Ok(f) = s.parse::<f64>() {
                f as i64
            } else {
                0
            }
        }
        _ => 0,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map_of(value: Value) -> RawDetections {
        match value {
            Value::Object(map) => RawDetections::Map(map),
            other => panic!("expected object, got {other}"),
        }
    }

    // -- Coercion ----------------------------------------------------------

    #[test]
    fn integer_counts_pass_through() {
        let out = normalize(&map_of(json!({"aphids": 3, "thrips": 2})));
        assert_eq!(out.get("aphids"), Some(&3));
        assert_eq!(out.get("thrips"), Some(&2));
    }

    #[test]
    fn stringified_counts_are_parsed() {
        let out = normalize(&map_of(json!({"aphids": "7", "thrips": "2.9"})));
        assert_eq!(out.get("aphids"), Some(&7));
        assert_eq!(out.get("thrips"), Some(&2), "float strings truncate");
    }

    #[test]
    fn float_counts_truncate_toward_zero() {
        let out = normalize(&map_of(json!({"beetle": 4.8})));
        assert_eq!(out.get("beetle"), Some(&4));
    }

    #[test]
    fn garbage_counts_drop_to_nothing() {
        let out = normalize(&map_of(json!({"aphids": "banana"})));
        assert!(out.is_empty());
    }

    #[test]
    fn negative_and_zero_counts_are_dropped() {
        let out = normalize(&map_of(json!({"aphids": -5, "thrips": 0, "beetle": 1})));
        assert_eq!(out.len(), 1);
        assert_eq!(out.get("beetle"), Some(&1));
    }

    #[test]
    fn null_and_bool_counts_coerce_to_zero() {
        let out = normalize(&map_of(json!({"aphids": null, "thrips": true})));
        assert!(out.is_empty());
    }

    // -- Labels ------------------------------------------------------------

    #[test]
    fn labels_are_trimmed() {
        let out = normalize(&map_of(json!({"  aphids  ": 2})));
        assert_eq!(out.get("aphids"), Some(&2));
    }

    #[test]
    fn empty_labels_are_dropped() {
        let out = normalize(&map_of(json!({"   ": 9})));
        assert!(out.is_empty());
    }

    #[test]
    fn labels_colliding_after_trim_are_summed() {
        let out = normalize(&map_of(json!({"aphids": 2, " aphids": 3})));
        assert_eq!(out.get("aphids"), Some(&5));
    }

    // -- Legacy single shape -----------------------------------------------

    #[test]
    fn single_shape_normalizes() {
        let raw = RawDetections::Single {
            label: "whiteflies".to_string(),
            count: json!(4),
        };
        let out = normalize(&raw);
        assert_eq!(out.get("whiteflies"), Some(&4));
    }

    #[test]
    fn single_shape_with_string_count() {
        let raw = RawDetections::Single {
            label: "thrips".to_string(),
            count: json!("12"),
        };
        assert_eq!(normalize(&raw).get("thrips"), Some(&12));
    }

    // -- Idempotence -------------------------------------------------------

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize(&map_of(
            json!({"aphids": "3", "thrips": 2.7, "beetle": -1, "gnats": "junk"}),
        ));

        let as_map: Map<String, Value> = once
            .iter()
            .map(|(label, count)| (label.clone(), json!(count)))
            .collect();
        let twice = normalize(&RawDetections::Map(as_map));

        assert_eq!(once, twice);
    }

    // -- Derived fields ----------------------------------------------------

    #[test]
    fn total_sums_all_counts() {
        let out = normalize(&map_of(json!({"aphids": 3, "thrips": 2})));
        assert_eq!(total(&out), 5);
    }

    #[test]
    fn summary_is_sorted_by_label() {
        let out = normalize(&map_of(json!({"thrips": 2, "aphids": 3})));
        assert_eq!(summary(&out), "aphids:3,thrips:2");
    }

    #[test]
    fn summary_of_empty_map_is_empty() {
        assert_eq!(summary(&DetectionMap::new()), "");
    }
}
