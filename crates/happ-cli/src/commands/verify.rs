//! Verify command - check that a generated chart renders the same resources

use clap::Args;
use happ_core::{parse_documents, Value};
use happ_diff::{compare_detailed, compare_entities, equivalent, DetailedResult, EntityComparison, EquivalenceResult};
use std::time::Duration;
use tracing::info;

use super::{ensure_single_stdin, read_input};
use crate::config::VerifyConfig;
use crate::display;
use crate::error::{CliError, Result};
use crate::exit_codes;
use crate::timeout::{parse_duration, run_with_timeout};

/// Stage name used in timeout errors
const STAGE: &str = "verify equivalence";

#[derive(Debug, Default, Args)]
pub struct VerifyArgs {
    /// Rendered manifests of the original chart (`-` for stdin)
    pub source: String,

    /// Rendered manifests of the generated chart (`-` for stdin)
    pub generated: String,

    /// Show every resource with its classification
    #[arg(long)]
    pub detailed: bool,

    /// Print the per-resource classification as JSON
    #[arg(long, conflicts_with = "entities")]
    pub json: bool,

    /// Print classification, normalized YAML and change logs as JSON
    #[arg(long)]
    pub entities: bool,

    /// Time limit for the comparison, e.g. 30s or 5m (0s disables)
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,
}

enum Report {
    Verdict(EquivalenceResult),
    Detailed(DetailedResult),
    Entities(EntityComparison),
}

impl Report {
    fn equal(&self) -> bool {
        match self {
            Report::Verdict(result) => result.equal,
            Report::Detailed(result) => result.equal,
            Report::Entities(result) => result.compare.equal,
        }
    }
}

fn load_manifests(path: &str, what: &str) -> Result<Vec<Value>> {
    let content = read_input(path, what)?;
    parse_documents(&content).map_err(|e| CliError::input(format!("parse {} manifests: {}", what, e)))
}

pub fn run(args: &VerifyArgs, config: &VerifyConfig) -> Result<()> {
    ensure_single_stdin(&args.source, &args.generated)?;
    let source = load_manifests(&args.source, "source")?;
    let generated = load_manifests(&args.generated, "generated")?;
    info!(source = source.len(), generated = generated.len(), "verifying manifests");

    let limit = args.timeout.unwrap_or(config.timeout);
    let (detailed, json, entities) = (args.detailed, args.json, args.entities);
    let report = run_with_timeout(STAGE, limit, move || {
        if entities {
            Report::Entities(compare_entities(&source, &generated))
        } else if json || detailed {
            Report::Detailed(compare_detailed(&source, &generated))
        } else {
            Report::Verdict(equivalent(&source, &generated))
        }
    })?;

    match &report {
        Report::Entities(result) => print_json(result)?,
        Report::Detailed(result) if json => print_json(result)?,
        Report::Detailed(result) => display::print_detailed(result),
        Report::Verdict(result) => display::print_verdict(result),
    }

    if !report.equal() {
        std::process::exit(exit_codes::NOT_EQUIVALENT);
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CliError::internal(e.to_string()))?;
    println!("{}", json);
    Ok(())
}
