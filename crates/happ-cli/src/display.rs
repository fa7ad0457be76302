//! Display formatting for CLI output
//!
//! Renders equivalence results grouped by status, with the first difference of
//! each changed resource.

use console::{style, StyledObject};
use happ_diff::{DetailedResult, EquivalenceResult, ResourceComparison, ResourceStatus};

fn status_icon(status: ResourceStatus) -> StyledObject<&'static str> {
    match status {
        ResourceStatus::Equal => style("✓").green(),
        ResourceStatus::Changed => style("~").yellow(),
        ResourceStatus::MissingInGenerated => style("-").red(),
        ResourceStatus::ExtraInGenerated => style("+").green(),
    }
}

fn status_label(status: ResourceStatus) -> &'static str {
    match status {
        ResourceStatus::Equal => "equal",
        ResourceStatus::Changed => "changed",
        ResourceStatus::MissingInGenerated => "missing in generated chart",
        ResourceStatus::ExtraInGenerated => "extra in generated chart",
    }
}

/// One line for the fast verdict
pub fn print_verdict(result: &EquivalenceResult) {
    if result.equal {
        println!("{} Equivalence check: {}", style("✓").green().bold(), result.summary);
    } else {
        println!("{} Equivalence check failed: {}", style("✗").red().bold(), result.summary);
    }
}

/// Per-resource table followed by the summary line
pub fn print_detailed(result: &DetailedResult) {
    for resource in &result.resources {
        print_resource(resource);
    }

    if !result.duplicates.is_empty() {
        println!();
        println!(
            "{} {} duplicate resource key(s), later documents were used:",
            style("⚠").yellow(),
            result.duplicates.len()
        );
        for key in &result.duplicates {
            println!("    {}", style(key).dim());
        }
    }

    println!();
    if result.equal {
        println!("{} {}", style("✓").green().bold(), result.summary);
    } else {
        println!("{} {}", style("✗").red().bold(), result.summary);
    }
}

fn print_resource(resource: &ResourceComparison) {
    println!(
        "  {} {} {}",
        status_icon(resource.status),
        style(&resource.key).cyan(),
        style(format!("({})", status_label(resource.status))).dim()
    );
    if let Some(path) = &resource.diff_path {
        println!(
            "      at {}: {} {} {}",
            style(path).bold(),
            style(resource.source_value.as_deref().unwrap_or("null")).red(),
            style("->").dim(),
            style(resource.generated_value.as_deref().unwrap_or("null")).green()
        );
    }
}
