//! Structured JSON report of a change log

use serde::{Deserialize, Serialize};

use super::{compute_stats, DiffEntry, Stats};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonReport {
    pub equal: bool,
    pub stats: Stats,
    pub items: Vec<DiffEntry>,
}

impl JsonReport {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub fn json_report(entries: &[DiffEntry]) -> JsonReport {
    JsonReport {
        equal: entries.is_empty(),
        stats: compute_stats(entries),
        items: entries.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::parse_entries;

    #[test]
    fn test_report_counts() {
        let report = json_report(&parse_entries("~ $.a: 1 -> 2\n"));
        assert!(!report.equal);
        assert_eq!(report.stats.changed, 1);
        assert_eq!(report.stats.total, 1);

        let json = report.to_json_pretty().unwrap();
        assert!(json.contains("\"equal\": false"));
        assert!(json.contains("\"changed\": 1"));
    }

    #[test]
    fn test_equal_report() {
        let report = json_report(&[]);
        insta::assert_snapshot!(report.to_json_pretty().unwrap(), @r#"
        {
          "equal": true,
          "stats": {
            "added": 0,
            "removed": 0,
            "changed": 0,
            "total": 0
          },
          "items": []
        }
        "#);
    }

    #[test]
    fn test_report_reads_back() {
        let report = json_report(&parse_entries("+ $.b: 3\n- $.c: {\"k\":\"v\"}\nnoise"));
        let json = report.to_json_pretty().unwrap();
        let back: JsonReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
