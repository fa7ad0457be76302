//! Comparison options

use serde::{Deserialize, Serialize};

/// Identifier paths tried, in priority order, when pairing list items
pub const BUILTIN_IDENTIFIER_PATHS: &[&str] = &[
    "metadata.name",
    // envFrom-style references
    "configMapRef.name",
    "secretRef.name",
    "name",
    "id",
    "key",
    "mountPath",
    "path",
    "containerPort",
    "port",
];

/// Options controlling semantic diff behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiffOptions {
    /// Pair list items by identity or content instead of position
    pub ignore_order_changes: bool,

    /// Treat strings equal when they only differ in leading/trailing whitespace
    pub ignore_whitespace_change: bool,

    /// Extra dotted field paths used to pair list items (e.g. "meta.id")
    pub additional_identifier_paths: Vec<String>,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            ignore_order_changes: true,
            ignore_whitespace_change: false,
            additional_identifier_paths: BUILTIN_IDENTIFIER_PATHS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl DiffOptions {
    /// Options with every flag off and no caller identifiers
    pub fn strict() -> Self {
        Self {
            ignore_order_changes: false,
            ignore_whitespace_change: false,
            additional_identifier_paths: Vec::new(),
        }
    }

    pub fn with_ignore_order(mut self, ignore: bool) -> Self {
        self.ignore_order_changes = ignore;
        self
    }

    pub fn with_ignore_whitespace(mut self, ignore: bool) -> Self {
        self.ignore_whitespace_change = ignore;
        self
    }

    /// Append an identifier path
    pub fn with_identifier(mut self, path: impl Into<String>) -> Self {
        self.additional_identifier_paths.push(path.into());
        self
    }

    /// Candidate identifier paths: built-ins first, then caller paths
    ///
    /// Empty entries are dropped and duplicates keep their first position.
    pub fn identifier_candidates(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        let all = BUILTIN_IDENTIFIER_PATHS
            .iter()
            .copied()
            .chain(self.additional_identifier_paths.iter().map(String::as_str));
        for candidate in all {
            if !candidate.is_empty() && !out.contains(&candidate) {
                out.push(candidate);
            }
        }
        out
    }
}
