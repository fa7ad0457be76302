//! Short display forms of values
//!
//! Values shown in change logs and verifier reports are bounded in length:
//! scalars are rendered as compact JSON, composite values as single-line YAML
//! (line breaks shown as a literal `\n`).

use happ_core::Value;

/// Limit for scalar renderings in the change log
pub const SCALAR_DISPLAY_LIMIT: usize = 160;

/// Limit for composite renderings in the change log
pub const COMPOSITE_DISPLAY_LIMIT: usize = 200;

/// Limit for values shown in equivalence reports
pub const REPORT_DISPLAY_LIMIT: usize = 120;

const ELLIPSIS: &str = "...";

/// Render a value for the change log; a missing side renders as `null`
pub fn render_value(value: Option<&Value>) -> String {
    match value {
        Some(v) if v.is_composite() => short_yaml(v),
        Some(v) => short_json(v, SCALAR_DISPLAY_LIMIT),
        None => "null".to_string(),
    }
}

/// Render a value for an equivalence report
pub fn render_report_value(value: Option<&Value>) -> String {
    match value {
        Some(v) => short_json(v, REPORT_DISPLAY_LIMIT),
        None => "null".to_string(),
    }
}

fn short_json(value: &Value, limit: usize) -> String {
    let text = serde_json::to_string(value).unwrap_or_else(|_| format!("{:?}", value));
    truncate(&text, limit)
}

fn short_yaml(value: &Value) -> String {
    match serde_yaml::to_string(value) {
        Ok(yaml) => truncate(&yaml.trim().replace('\n', "\\n"), COMPOSITE_DISPLAY_LIMIT),
        Err(_) => short_json(value, SCALAR_DISPLAY_LIMIT),
    }
}

/// Cut `text` to at most `limit` characters, appending `...` when cut
pub fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((end, _)) => format!("{}{}", &text[..end], ELLIPSIS),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use happ_core::Mapping;

    #[test]
    fn test_scalars_render_as_json() {
        assert_eq!(render_value(Some(&Value::from("old"))), "\"old\"");
        assert_eq!(render_value(Some(&Value::from(3i64))), "3");
        assert_eq!(render_value(Some(&Value::Null)), "null");
        assert_eq!(render_value(None), "null");
    }

    #[test]
    fn test_composite_renders_as_yaml() {
        let mut map = Mapping::new();
        map.insert("k".into(), Value::from("v"));
        map.insert("n".into(), Value::from(1i64));
        assert_eq!(render_value(Some(&Value::Mapping(map))), "k: v\\nn: 1");
    }

    #[test]
    fn test_long_scalar_is_truncated() {
        let long = Value::from("a".repeat(300));
        let rendered = render_value(Some(&long));
        assert!(rendered.ends_with("..."));
        assert_eq!(rendered.chars().count(), SCALAR_DISPLAY_LIMIT + 3);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("ééé", 2), "éé...");
        assert_eq!(truncate("abc", 3), "abc");
    }

    #[test]
    fn test_report_values() {
        let long = Value::Sequence((0..100i64).map(Value::from).collect());
        let rendered = render_report_value(Some(&long));
        assert_eq!(rendered.chars().count(), REPORT_DISPLAY_LIMIT + 3);
        assert_eq!(render_report_value(None), "null");
    }
}
