//! Diff command - semantic diff of two YAML files

use clap::Args;
use happ_diff::{
    diff_yaml, format_text, json_report, labels_from_paths, render_changes, ColorMode, DiffEntry,
    DiffOptions, TextOptions,
};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

use super::{ensure_single_stdin, read_input};
use crate::config::{DiffConfig, OutputFormat};
use crate::error::{CliError, Result};
use crate::exit_codes;

#[derive(Debug, Default, Args)]
pub struct DiffArgs {
    /// Source YAML file (`-` for stdin)
    #[arg(value_name = "FROM")]
    pub from_arg: Option<String>,

    /// Target YAML file (`-` for stdin)
    #[arg(value_name = "TO")]
    pub to_arg: Option<String>,

    /// Source YAML file, instead of the first positional argument
    #[arg(long)]
    pub from: Option<String>,

    /// Target YAML file, instead of the second positional argument
    #[arg(long)]
    pub to: Option<String>,

    /// Also write the change log (or JSON report) to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Ignore list order changes when possible (default)
    #[arg(long)]
    pub ignore_order: bool,

    /// Compare lists by position
    #[arg(long, conflicts_with = "ignore_order")]
    pub respect_order: bool,

    /// Ignore leading/trailing whitespace changes in strings
    #[arg(long)]
    pub ignore_whitespace: bool,

    /// Extra identifier path used to pair list items (repeatable), e.g. meta.id
    #[arg(long = "id", value_name = "PATH")]
    pub ids: Vec<String>,

    /// Do not print the diff; exit code only (0 equal, 1 different)
    #[arg(short, long)]
    pub quiet: bool,

    /// Exit with code 1 when differences are found
    #[arg(long)]
    pub fail_on_diff: bool,

    /// Color mode: auto, always or never
    #[arg(long, env = "HAPP_COLOR", value_parser = ColorMode::from_str)]
    pub color: Option<ColorMode>,

    /// Disable colors (same as --color never)
    #[arg(long)]
    pub no_color: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Print summary stats (text format only)
    #[arg(long)]
    pub stats: bool,

    /// Label of the source side in the header
    #[arg(long)]
    pub label_from: Option<String>,

    /// Label of the target side in the header
    #[arg(long)]
    pub label_to: Option<String>,
}

impl DiffArgs {
    /// Resolve both inputs from flags and positional arguments
    fn inputs(&self) -> Result<(String, String)> {
        let mut positional = [self.from_arg.clone(), self.to_arg.clone()].into_iter().flatten();
        let from = self.from.clone().or_else(|| positional.next());
        let to = self.to.clone().or_else(|| positional.next());
        match (from, to) {
            (Some(from), Some(to)) => {
                ensure_single_stdin(&from, &to)?;
                Ok((from, to))
            }
            _ => Err(CliError::usage_with_help(
                "two inputs are required",
                "happ diff <FROM> <TO>, or --from <FILE> --to <FILE>",
            )),
        }
    }

    /// Flags layered over the configured options
    fn options(&self, config: &DiffConfig) -> DiffOptions {
        let mut options = config.options.clone();
        if self.respect_order {
            options.ignore_order_changes = false;
        } else if self.ignore_order {
            options.ignore_order_changes = true;
        }
        options.ignore_whitespace_change |= self.ignore_whitespace;
        options.additional_identifier_paths.extend(self.ids.iter().cloned());
        options
    }

    fn color_mode(&self, config: &DiffConfig) -> ColorMode {
        if self.no_color {
            return ColorMode::Never;
        }
        self.color.or(config.color).unwrap_or_default()
    }
}

pub fn run(args: &DiffArgs, config: &DiffConfig) -> Result<()> {
    let (from, to) = args.inputs()?;
    let options = args.options(config);
    let format = args.format.or(config.format).unwrap_or_default();

    let source = read_input(&from, "--from")?;
    let target = read_input(&to, "--to")?;

    let changes = diff_yaml(&source, &target, &options)?;
    let has_diff = !changes.is_empty();
    debug!(changes = changes.len(), ignore_order = options.ignore_order_changes, "diff complete");

    let entries: Vec<DiffEntry> = changes.iter().map(DiffEntry::from_record).collect();
    let output_text = match format {
        OutputFormat::Json => json_report(&entries).to_json_pretty()?,
        OutputFormat::Text => render_changes(&changes),
    };

    if let Some(path) = &args.output {
        std::fs::write(path, &output_text)
            .map_err(|e| CliError::io_context(format!("write {}", path.display()), e))?;
    }

    if !args.quiet {
        match format {
            OutputFormat::Json => println!("{}", output_text.trim_end_matches('\n')),
            OutputFormat::Text if has_diff => {
                let (from_label, to_label) = labels_from_paths(&from, &to);
                let text_options = TextOptions {
                    color: args.color_mode(config),
                    from_label: Some(args.label_from.clone().unwrap_or(from_label)),
                    to_label: Some(args.label_to.clone().unwrap_or(to_label)),
                    show_header: true,
                };
                let mut rendered = format_text(&entries, &text_options);
                if args.stats {
                    let stats = happ_diff::format::compute_stats(&entries);
                    rendered = format!("{}\n{}", rendered, stats.summary_line());
                }
                println!("{}", rendered);
            }
            OutputFormat::Text if args.output.is_none() => {
                if args.stats {
                    println!("No differences. (added=0 removed=0 changed=0)");
                } else {
                    println!("No differences.");
                }
            }
            OutputFormat::Text => {}
        }
    }

    if has_diff && (args.fail_on_diff || args.quiet) {
        std::process::exit(exit_codes::DIFFERENCES);
    }
    Ok(())
}
