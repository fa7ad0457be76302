//! happ Diff - semantic document diff and resource equivalence
//!
//! This crate provides:
//! - **Normalizer**: canonical trees, with a Kubernetes-aware equivalence mode
//! - **List Reconciler**: pairs list items by identity, identifier field or content
//! - **Structural Comparator**: one walk, reporting either every change or the first
//! - **Formatters**: colored text change logs and JSON reports
//! - **Equivalence Verifier**: per-resource classification of two manifest corpora
//!
//! ```
//! use happ_diff::{diff_yaml, render_changes, DiffOptions};
//!
//! let changes = diff_yaml("env: [A, B]", "env: [B, A]", &DiffOptions::default()).unwrap();
//! assert_eq!(render_changes(&changes), "");
//! ```

pub mod change;
pub mod compare;
pub mod equivalence;
pub mod error;
pub mod format;
pub mod normalize;
pub mod options;
pub mod path;
pub mod reconcile;
pub mod render;

pub use change::{render_changes, ChangeKind, ChangeRecord};
pub use compare::{diff_values, first_difference, CollectAll, Comparator, DiffSink, FirstDifference};
pub use equivalence::{
    compare_detailed, compare_entities, equivalent, CorpusIndex, DetailedResult,
    EntityComparison, EquivalenceResult, ResourceComparison, ResourceStatus,
};
pub use error::{DiffError, Result, Side};
pub use format::{
    format_text, json_report, labels_from_paths, parse_entries, ColorMode, DiffEntry, JsonReport,
    Stats, TextOptions,
};
pub use normalize::{normalize, normalize_document, NormalizeMode};
pub use options::{DiffOptions, BUILTIN_IDENTIFIER_PATHS};
pub use path::{Path, PathSegment};

use happ_core::parse_yaml_stream;

/// Parse two YAML streams and diff them
///
/// Each stream may hold several documents; see [`happ_core::parse_yaml_stream`].
pub fn diff_yaml(source: &str, generated: &str, options: &DiffOptions) -> Result<Vec<ChangeRecord>> {
    let left = parse_yaml_stream(source).map_err(|e| DiffError::parse(Side::Source, e))?;
    let right = parse_yaml_stream(generated).map_err(|e| DiffError::parse(Side::Generated, e))?;
    Ok(diff_values(&left, &right, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_yaml_reports_changes() {
        let changes = diff_yaml("a: 1\n", "a: 2\n", &DiffOptions::default()).unwrap();
        assert_eq!(render_changes(&changes), "~ $.a: 1 -> 2");
    }

    #[test]
    fn test_diff_yaml_names_failing_side() {
        let err = diff_yaml("a: [\n", "a: 1\n", &DiffOptions::default()).unwrap_err();
        assert!(err.to_string().starts_with("parse source yaml"));

        let err = diff_yaml("a: 1\n", "a: [\n", &DiffOptions::default()).unwrap_err();
        assert!(err.to_string().starts_with("parse generated yaml"));
    }

    #[test]
    fn test_diff_yaml_is_deterministic() {
        let left = "b: {y: 1, x: 2}\na: [3, 1]\n";
        let right = "a: [1, 4]\nb: {x: 3, z: 0}\n";
        let first = render_changes(&diff_yaml(left, right, &DiffOptions::default()).unwrap());
        for _ in 0..5 {
            let again = render_changes(&diff_yaml(left, right, &DiffOptions::default()).unwrap());
            assert_eq!(again, first);
        }
    }
}
