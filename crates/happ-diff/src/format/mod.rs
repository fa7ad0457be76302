//! Change-log formatters
//!
//! The change log produced by [`render_changes`](crate::render_changes) is the
//! interchange format: it is parsed back into [`DiffEntry`] values which the
//! text and JSON formatters render. Identifier predicates and quoted left
//! values may contain the `": "` and `" -> "` separators. Parsing is lossy
//! where a rendered value was truncated, where a plain mapping key contains
//! `": "`, or where a composite left value contains `" -> "`.

mod json;
mod text;

pub use json::{json_report, JsonReport};
pub use text::{format_text, ColorMode, TextOptions};

use serde::{Deserialize, Serialize};
use std::path::Path as FsPath;

use crate::change::{ChangeKind, ChangeRecord};
use crate::render::render_value;

/// One parsed change-log line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffEntry {
    /// `+`, `-`, `~`, or empty for a line that is not a change
    pub kind: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,

    /// Value of an added or removed entry, or the raw text of an unknown line
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub left: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub right: String,

    pub is_known: bool,
}

impl DiffEntry {
    pub fn from_record(record: &ChangeRecord) -> Self {
        let kind = record.kind.symbol().to_string();
        let path = record.path.clone();
        match record.kind {
            ChangeKind::Added => Self {
                kind,
                path,
                body: render_value(record.right.as_ref()),
                is_known: true,
                ..Default::default()
            },
            ChangeKind::Removed => Self {
                kind,
                path,
                body: render_value(record.left.as_ref()),
                is_known: true,
                ..Default::default()
            },
            ChangeKind::Changed => Self {
                kind,
                path,
                left: render_value(record.left.as_ref()),
                right: render_value(record.right.as_ref()),
                is_known: true,
                ..Default::default()
            },
        }
    }

    pub fn change_kind(&self) -> Option<ChangeKind> {
        self.kind.chars().next().and_then(ChangeKind::from_symbol)
    }

    fn unknown(line: &str) -> Self {
        Self {
            body: line.to_string(),
            ..Default::default()
        }
    }
}

/// Parse a single change-log line
///
/// Lines that do not start with `+ `, `- ` or `~ ` come back with
/// `is_known == false` and the whole line as body.
pub fn parse_line(line: &str) -> DiffEntry {
    let bytes = line.as_bytes();
    if bytes.len() < 3 || bytes[1] != b' ' {
        return DiffEntry::unknown(line);
    }
    let Some(kind) = ChangeKind::from_symbol(bytes[0] as char) else {
        return DiffEntry::unknown(line);
    };
    let rest = &line[2..];
    let mut entry = DiffEntry {
        kind: kind.symbol().to_string(),
        is_known: true,
        ..Default::default()
    };

    let Some(end) = path_end(rest) else {
        entry.body = rest.to_string();
        return entry;
    };
    entry.path = rest[..end].to_string();
    let payload = &rest[end + PATH_SEPARATOR.len()..];

    match kind {
        ChangeKind::Added | ChangeKind::Removed => entry.body = payload.to_string(),
        ChangeKind::Changed => match split_changed(payload) {
            Some((left, right)) => {
                entry.left = left.to_string();
                entry.right = right.to_string();
            }
            None => entry.body = payload.to_string(),
        },
    }
    entry
}

const PATH_SEPARATOR: &str = ": ";
const VALUE_SEPARATOR: &str = " -> ";

/// Byte offset of the separator ending the path
///
/// `[...]` predicates are skipped, honouring `\]` escapes, so identifier values
/// may contain the separator. Falls back to the first separator when brackets
/// do not balance.
fn path_end(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let mut in_predicate = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if in_predicate => i += 1,
            b'[' if !in_predicate => in_predicate = true,
            b']' if in_predicate => in_predicate = false,
            b':' if !in_predicate && bytes.get(i + 1) == Some(&b' ') => return Some(i),
            _ => {}
        }
        i += 1;
    }
    rest.find(PATH_SEPARATOR)
}

/// Split `left -> right`, reading a quoted left value as one JSON string
fn split_changed(payload: &str) -> Option<(&str, &str)> {
    if payload.starts_with('"') {
        let mut tokens = serde_json::Deserializer::from_str(payload).into_iter::<serde_json::Value>();
        if let Some(Ok(serde_json::Value::String(_))) = tokens.next() {
            let end = tokens.byte_offset();
            if let Some(right) = payload[end..].strip_prefix(VALUE_SEPARATOR) {
                return Some((&payload[..end], right));
            }
        }
    }
    payload.split_once(VALUE_SEPARATOR)
}

/// Parse a whole change log; trailing newlines are ignored
pub fn parse_entries(diff: &str) -> Vec<DiffEntry> {
    let diff = diff.trim_end_matches('\n');
    if diff.is_empty() {
        return Vec::new();
    }
    diff.split('\n').map(parse_line).collect()
}

/// Counts of each change kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub added: usize,
    pub removed: usize,
    pub changed: usize,
    pub total: usize,
}

impl Stats {
    pub fn summary_line(&self) -> String {
        format!(
            "stats: added={} removed={} changed={} total={}",
            self.added, self.removed, self.changed, self.total
        )
    }
}

pub fn compute_stats(entries: &[DiffEntry]) -> Stats {
    let mut stats = Stats::default();
    for entry in entries {
        match entry.change_kind() {
            Some(ChangeKind::Added) => stats.added += 1,
            Some(ChangeKind::Removed) => stats.removed += 1,
            Some(ChangeKind::Changed) => stats.changed += 1,
            None => {}
        }
    }
    stats.total = stats.added + stats.removed + stats.changed;
    stats
}

/// Display labels for the two inputs of a diff
///
/// `-` is shown as `stdin`, an empty path as `?`, anything else by its file name.
pub fn labels_from_paths(from: &str, to: &str) -> (String, String) {
    (label_for_path(from), label_for_path(to))
}

fn label_for_path(path: &str) -> String {
    match path {
        "-" => "stdin".to_string(),
        "" => "?".to_string(),
        _ => FsPath::new(path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::render_changes;
    use crate::{diff_yaml, DiffOptions};
    use happ_core::Value;

    #[test]
    fn test_parse_changed_line() {
        let entry = parse_line("~ $.x: old -> new");
        assert!(entry.is_known);
        assert_eq!(entry.kind, "~");
        assert_eq!(entry.path, "$.x");
        assert_eq!(entry.left, "old");
        assert_eq!(entry.right, "new");
        assert!(entry.body.is_empty());
    }

    #[test]
    fn test_parse_added_line() {
        let entry = parse_line("+ $.a.b: {\"x\":1}");
        assert_eq!(entry.change_kind(), Some(ChangeKind::Added));
        assert_eq!(entry.path, "$.a.b");
        assert_eq!(entry.body, "{\"x\":1}");
    }

    #[test]
    fn test_parse_line_without_separator() {
        let entry = parse_line("- something odd");
        assert!(entry.is_known);
        assert_eq!(entry.path, "");
        assert_eq!(entry.body, "something odd");

        let entry = parse_line("~ $.a: no arrow");
        assert_eq!(entry.path, "$.a");
        assert_eq!(entry.body, "no arrow");
    }

    #[test]
    fn test_parse_unknown_lines() {
        for line in ["weird line", "+", "+x: y", "* $.a: 1", "é $.a: 1"] {
            let entry = parse_line(line);
            assert!(!entry.is_known, "{}", line);
            assert_eq!(entry.body, line);
            assert_eq!(entry.kind, "");
        }
    }

    #[test]
    fn test_parse_entries_ignores_trailing_newlines() {
        assert!(parse_entries("").is_empty());
        assert!(parse_entries("\n\n").is_empty());
        assert_eq!(parse_entries("~ $.a: 1 -> 2\n+ $.b: 3\n- $.c: 4\n").len(), 3);
    }

    #[test]
    fn test_entries_round_trip_records() {
        let changes = diff_yaml(
            "a: 1\nb: {x: old, gone: [1, 2]}\nitems: [{name: a, v: 1}]\n",
            "a: 2\nb: {x: new, extra: {k: v}}\nitems: [{name: a, v: 2}, {name: b, v: 3}]\n",
            &DiffOptions::default(),
        )
        .unwrap();
        assert!(!changes.is_empty());

        let parsed = parse_entries(&render_changes(&changes));
        let expected: Vec<DiffEntry> = changes.iter().map(DiffEntry::from_record).collect();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_entries_round_trip_separators_in_values() {
        let changes = diff_yaml(
            "cmd: 'a -> b'\nitems: [{name: 'a: b', v: 1}, {name: 'x]: y', v: 1}]\n",
            "cmd: c\nitems: [{name: 'a: b', v: 2}, {name: 'x]: y', v: 3}]\n",
            &DiffOptions::default(),
        )
        .unwrap();
        let log = render_changes(&changes);
        assert!(log.contains("~ $.cmd: \"a -> b\" -> \"c\""), "{}", log);
        assert!(log.contains("~ $.items[name=x\\]: y].v: 1 -> 3"), "{}", log);

        let parsed = parse_entries(&log);
        let expected: Vec<DiffEntry> = changes.iter().map(DiffEntry::from_record).collect();
        assert_eq!(parsed, expected);
        assert_eq!(parsed[0].left, "\"a -> b\"");
        assert_eq!(parsed[0].right, "\"c\"");
        assert_eq!(parsed[1].path, "$.items[name=a: b].v");
        assert_eq!(parsed[1].left, "1");
    }

    #[test]
    fn test_parse_unbalanced_predicate_falls_back() {
        let entry = parse_line("+ $.a[b: 1");
        assert_eq!(entry.path, "$.a[b");
        assert_eq!(entry.body, "1");
    }

    #[test]
    fn test_from_record_missing_side_is_null() {
        let record = ChangeRecord {
            kind: ChangeKind::Changed,
            path: "$.a".into(),
            left: None,
            right: Some(Value::from(1i64)),
        };
        let entry = DiffEntry::from_record(&record);
        assert_eq!(entry.left, "null");
        assert_eq!(entry.right, "1");
    }

    #[test]
    fn test_compute_stats() {
        let mut entries = parse_entries("~ $.a: 1 -> 2\n+ $.b: 3\n- $.c: 4\n+ $.d: 5");
        entries.push(parse_line("not a change"));
        let stats = compute_stats(&entries);
        assert_eq!(
            stats,
            Stats {
                added: 2,
                removed: 1,
                changed: 1,
                total: 4
            }
        );
        assert_eq!(stats.summary_line(), "stats: added=2 removed=1 changed=1 total=4");
    }

    #[test]
    fn test_labels_from_paths() {
        assert_eq!(
            labels_from_paths("/tmp/a.yaml", "-"),
            ("a.yaml".to_string(), "stdin".to_string())
        );
        assert_eq!(labels_from_paths("", "b.yml"), ("?".to_string(), "b.yml".to_string()));
    }

    #[test]
    fn test_entry_serialization_omits_empty_fields() {
        let json = serde_json::to_value(parse_line("+ $.b: 3")).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "+", "path": "$.b", "body": "3", "isKnown": true}));
    }
}
