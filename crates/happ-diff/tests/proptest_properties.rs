//! Property-based tests for the comparator, normalizer and change log.
//!
//! Trees are generated recursively with mapping keys biased towards the field
//! names the engine treats specially (`name`, `metadata`, `status`).

use happ_core::{Number, Value};
use happ_diff::format::DiffEntry;
use happ_diff::{
    diff_values, first_difference, normalize, parse_entries, render_changes, DiffOptions,
    NormalizeMode,
};
use proptest::prelude::*;

/// Strings for general trees, including both change-log separators
const ANY_TEXT: &str = "[a-z :>\\-\\]]{0,8}";

/// Strings that keep every rendered value unambiguous in a change log
const LOG_SAFE_TEXT: &str = "[a-z :\\]]{0,6}";

fn key() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("name".to_string()),
        Just("metadata".to_string()),
        Just("status".to_string()),
        "[a-z]{1,3}",
    ]
}

fn scalar(text: &'static str) -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(Number::Int(n))),
        (-1.0e6f64..1.0e6).prop_map(|f| Value::Number(Number::Float(f))),
        text.prop_map(Value::String),
    ]
}

fn tree(text: &'static str) -> impl Strategy<Value = Value> {
    scalar(text).prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Sequence),
            prop::collection::btree_map(key(), inner, 0..4).prop_map(Value::Mapping),
        ]
    })
}

fn presets() -> [DiffOptions; 3] {
    [
        DiffOptions::default(),
        DiffOptions::strict(),
        DiffOptions::default().with_ignore_whitespace(true),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn self_compare_is_empty(value in tree(ANY_TEXT)) {
        for options in presets() {
            prop_assert!(diff_values(&value, &value, &options).is_empty());
            prop_assert_eq!(first_difference(&value, &value, &options), None);
        }
    }

    #[test]
    fn normalization_is_idempotent(value in tree(ANY_TEXT)) {
        for mode in [NormalizeMode::Generic, NormalizeMode::Equivalence] {
            let once = normalize(&value, mode);
            prop_assert_eq!(normalize(&once, mode), once);
        }
    }

    #[test]
    fn first_difference_is_first_change(left in tree(ANY_TEXT), right in tree(ANY_TEXT)) {
        for options in presets() {
            let all = diff_values(&left, &right, &options);
            let first = first_difference(&left, &right, &options);
            prop_assert_eq!(first.as_ref(), all.first());
        }
    }

    #[test]
    fn diff_is_deterministic(left in tree(ANY_TEXT), right in tree(ANY_TEXT)) {
        let options = DiffOptions::default();
        let first = render_changes(&diff_values(&left, &right, &options));
        prop_assert_eq!(render_changes(&diff_values(&left, &right, &options)), first);
    }

    #[test]
    fn change_log_reads_back(left in tree(LOG_SAFE_TEXT), right in tree(LOG_SAFE_TEXT)) {
        let changes = diff_values(&left, &right, &DiffOptions::default());
        let log = render_changes(&changes);
        // truncated renderings are the one accepted loss
        prop_assume!(!log.contains("..."));

        let expected: Vec<DiffEntry> = changes.iter().map(DiffEntry::from_record).collect();
        prop_assert_eq!(parse_entries(&log), expected);
    }
}
