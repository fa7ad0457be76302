//! Change records produced by the comparator

use happ_core::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::render::render_value;

/// Kind of a single difference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Present only on the right side
    Added,

    /// Present only on the left side
    Removed,

    /// Present on both sides with different content
    Changed,
}

impl ChangeKind {
    /// Line prefix used in the change log
    pub fn symbol(&self) -> char {
        match self {
            ChangeKind::Added => '+',
            ChangeKind::Removed => '-',
            ChangeKind::Changed => '~',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(ChangeKind::Added),
            '-' => Some(ChangeKind::Removed),
            '~' => Some(ChangeKind::Changed),
            _ => None,
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Added => write!(f, "added"),
            ChangeKind::Removed => write!(f, "removed"),
            ChangeKind::Changed => write!(f, "changed"),
        }
    }
}

/// One difference between two trees
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeRecord {
    pub kind: ChangeKind,

    /// Rendered location, e.g. `$.spec.containers[name=app].image`
    pub path: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<Value>,
}

impl ChangeRecord {
    pub fn added(path: impl Into<String>, right: Value) -> Self {
        Self {
            kind: ChangeKind::Added,
            path: path.into(),
            left: None,
            right: Some(right),
        }
    }

    pub fn removed(path: impl Into<String>, left: Value) -> Self {
        Self {
            kind: ChangeKind::Removed,
            path: path.into(),
            left: Some(left),
            right: None,
        }
    }

    pub fn changed(path: impl Into<String>, left: Value, right: Value) -> Self {
        Self {
            kind: ChangeKind::Changed,
            path: path.into(),
            left: Some(left),
            right: Some(right),
        }
    }
}

impl fmt::Display for ChangeRecord {
    /// One change-log line: `+ path: value`, `- path: value` or `~ path: left -> right`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ChangeKind::Added => write!(f, "+ {}: {}", self.path, render_value(self.right.as_ref())),
            ChangeKind::Removed => write!(f, "- {}: {}", self.path, render_value(self.left.as_ref())),
            ChangeKind::Changed => write!(
                f,
                "~ {}: {} -> {}",
                self.path,
                render_value(self.left.as_ref()),
                render_value(self.right.as_ref())
            ),
        }
    }
}

/// Render a change log, one line per record; empty when there are no changes
pub fn render_changes(changes: &[ChangeRecord]) -> String {
    changes
        .iter()
        .map(ChangeRecord::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_round_trip() {
        for kind in [ChangeKind::Added, ChangeKind::Removed, ChangeKind::Changed] {
            assert_eq!(ChangeKind::from_symbol(kind.symbol()), Some(kind));
        }
        assert_eq!(ChangeKind::from_symbol('!'), None);
    }

    #[test]
    fn test_render_lines() {
        let changes = vec![
            ChangeRecord::changed("$.a", Value::from(1i64), Value::from(2i64)),
            ChangeRecord::removed("$.b.remove", Value::from(true)),
            ChangeRecord::added("$.b.add", Value::from("y")),
        ];
        assert_eq!(
            render_changes(&changes),
            "~ $.a: 1 -> 2\n- $.b.remove: true\n+ $.b.add: \"y\""
        );
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_changes(&[]), "");
    }

    #[test]
    fn test_serialize_record() {
        let record = ChangeRecord::added("$.x", Value::from("v"));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "added");
        assert!(json.get("left").is_none());
        assert_eq!(json["right"], "v");
    }
}
