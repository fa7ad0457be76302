//! Aligned, optionally colored text rendering of a change log

use console::{measure_text_width, Style};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::DiffEntry;
use crate::change::ChangeKind;
use crate::error::DiffError;

/// Paths longer than this do not widen the path column
const MAX_PATH_COLUMN: usize = 80;

/// Literal line-break marker used by composite value renderings
const LINE_BREAK: &str = "\\n";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color when stdout is a terminal that supports it
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolve to a concrete on/off decision
    pub fn enabled(self) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => console::colors_enabled(),
        }
    }
}

impl FromStr for ColorMode {
    type Err = DiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(ColorMode::Auto),
            "always" => Ok(ColorMode::Always),
            "never" => Ok(ColorMode::Never),
            _ => Err(DiffError::InvalidColorMode(s.to_string())),
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorMode::Auto => write!(f, "auto"),
            ColorMode::Always => write!(f, "always"),
            ColorMode::Never => write!(f, "never"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TextOptions {
    pub color: ColorMode,

    /// Header label of the left side, `source` when unset
    pub from_label: Option<String>,

    /// Header label of the right side, `target` when unset
    pub to_label: Option<String>,

    pub show_header: bool,
}

/// Applies styles only when coloring is on
struct Painter {
    enabled: bool,
}

impl Painter {
    fn paint(&self, text: &str, style: &Style) -> String {
        if self.enabled {
            style.clone().force_styling(true).apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// Color each line of a value rendered with literal `\n` breaks
    fn paint_value(&self, text: &str, style: &Style) -> String {
        if !self.enabled || !text.contains(LINE_BREAK) {
            return self.paint(text, style);
        }
        let separator = format!("{}{}", LINE_BREAK, self.paint("  ", &Style::new().dim()));
        text.split(LINE_BREAK)
            .map(|part| self.paint(part, style))
            .collect::<Vec<_>>()
            .join(&separator)
    }
}

/// Render entries as an aligned change log
///
/// Returns an empty string when there are no entries, header included.
pub fn format_text(entries: &[DiffEntry], options: &TextOptions) -> String {
    if entries.is_empty() {
        return String::new();
    }
    let painter = Painter {
        enabled: options.color.enabled(),
    };
    let width = entries
        .iter()
        .map(|e| measure_text_width(&e.path))
        .max()
        .unwrap_or(0)
        .min(MAX_PATH_COLUMN);

    let mut lines = Vec::with_capacity(entries.len() + 1);
    if options.show_header {
        let header = format!(
            "diff {} -> {}",
            options.from_label.as_deref().unwrap_or("source"),
            options.to_label.as_deref().unwrap_or("target"),
        );
        lines.push(painter.paint(&header, &Style::new().bold()));
    }
    for entry in entries {
        lines.push(render_entry(entry, width, &painter));
    }
    lines.join("\n")
}

fn render_entry(entry: &DiffEntry, width: usize, painter: &Painter) -> String {
    let Some(kind) = entry.change_kind().filter(|_| entry.is_known) else {
        return entry.body.clone();
    };
    let red = Style::new().red();
    let green = Style::new().green();

    let prefix = match kind {
        ChangeKind::Added => painter.paint("+", &green),
        ChangeKind::Removed => painter.paint("-", &red),
        ChangeKind::Changed => painter.paint("~", &Style::new().yellow()),
    };
    let padding = " ".repeat((width + 1).saturating_sub(measure_text_width(&entry.path)).max(1));
    let path = format!("{}{}", painter.paint(&entry.path, &Style::new().cyan()), padding);

    let body = match kind {
        ChangeKind::Added => painter.paint_value(&entry.body, &green),
        ChangeKind::Removed => painter.paint_value(&entry.body, &red),
        ChangeKind::Changed if entry.left.is_empty() && entry.right.is_empty() => entry.body.clone(),
        ChangeKind::Changed => format!(
            "{} {} {}",
            painter.paint_value(&entry.left, &red),
            painter.paint("->", &Style::new().dim()),
            painter.paint_value(&entry.right, &green),
        ),
    };
    format!("{} {}{}", prefix, path, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{parse_entries, parse_line};

    fn plain() -> TextOptions {
        TextOptions {
            color: ColorMode::Never,
            ..Default::default()
        }
    }

    #[test]
    fn test_readable_columns_without_color() {
        let entries = parse_entries("~ $.a: 1 -> 2\n+ $.long.path: {\"x\":1}\n- $.b: true\n");
        let options = TextOptions {
            show_header: true,
            from_label: Some("a.yaml".into()),
            to_label: Some("b.yaml".into()),
            ..plain()
        };
        insta::assert_snapshot!(format_text(&entries, &options), @r#"
        diff a.yaml -> b.yaml
        ~ $.a         1 -> 2
        + $.long.path {"x":1}
        - $.b         true
        "#);
    }

    #[test]
    fn test_default_labels() {
        let options = TextOptions {
            show_header: true,
            ..plain()
        };
        let out = format_text(&parse_entries("+ $.a: 1"), &options);
        assert!(out.starts_with("diff source -> target\n"));
    }

    #[test]
    fn test_always_color_adds_ansi() {
        let options = TextOptions {
            color: ColorMode::Always,
            ..Default::default()
        };
        let out = format_text(&parse_entries("~ $.a: 1 -> 2"), &options);
        assert!(out.contains("\x1b["), "{:?}", out);
        assert_eq!(console::strip_ansi_codes(&out), "~ $.a 1 -> 2");
    }

    #[test]
    fn test_never_color_has_no_ansi() {
        let out = format_text(&parse_entries("+ $.a: k: v\\nn: 1"), &plain());
        assert!(!out.contains("\x1b["));
        assert_eq!(out, "+ $.a k: v\\nn: 1");
    }

    #[test]
    fn test_multiline_values_colored_per_line() {
        let options = TextOptions {
            color: ColorMode::Always,
            ..Default::default()
        };
        let out = format_text(&parse_entries("+ $.a: k: v\\nn: 1"), &options);
        assert_eq!(console::strip_ansi_codes(&out), "+ $.a k: v\\n  n: 1");
    }

    #[test]
    fn test_unknown_line_passthrough() {
        let entries = vec![parse_line("weird line")];
        assert_eq!(format_text(&entries, &plain()), "weird line");
    }

    #[test]
    fn test_empty_diff_renders_nothing() {
        let options = TextOptions {
            show_header: true,
            ..plain()
        };
        assert_eq!(format_text(&[], &options), "");
    }

    #[test]
    fn test_long_paths_cap_the_column() {
        let long = format!("$.{}", "k".repeat(100));
        let entries = parse_entries(&format!("+ {}: 1\n+ $.a: 2", long));
        let out = format_text(&entries, &plain());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], format!("+ {} 1", long));
        assert_eq!(lines[1], format!("+ $.a{}2", " ".repeat(MAX_PATH_COLUMN - 3 + 1)));
    }

    #[test]
    fn test_color_mode_parsing() {
        assert_eq!(" Always ".parse::<ColorMode>().unwrap(), ColorMode::Always);
        assert_eq!("NEVER".parse::<ColorMode>().unwrap(), ColorMode::Never);
        assert_eq!("auto".parse::<ColorMode>().unwrap(), ColorMode::Auto);
        assert!("sometimes".parse::<ColorMode>().is_err());
    }
}
