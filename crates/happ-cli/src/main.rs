//! happ CLI - semantic YAML diff and chart equivalence verification

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod display;
mod error;
mod exit_codes;
mod timeout;

use commands::diff::DiffArgs;
use commands::verify::VerifyArgs;
use config::HappConfig;

#[derive(Parser)]
#[command(name = "happ")]
#[command(author = "helm-apps Contributors")]
#[command(version)]
#[command(about = "Semantic YAML diff and chart equivalence verification for helm-apps", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,

    /// Config file (default: ./.happ.yaml, then ~/.config/happ/config.yaml)
    #[arg(long, global = true, env = "HAPP_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show semantic differences between two YAML files
    #[command(after_help = "Examples:\n  happ diff ./before.yaml ./after.yaml\n  happ diff - ./after.yaml --ignore-whitespace --fail-on-diff")]
    Diff(DiffArgs),

    /// Check that two rendered charts produce equivalent resources
    Verify(VerifyArgs),
}

fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn run(cli: Cli) -> error::Result<()> {
    let config = HappConfig::load(cli.config.as_deref())?;
    match cli.command {
        Commands::Diff(args) => commands::diff::run(&args, &config.diff),
        Commands::Verify(args) => commands::verify::run(&args, &config.verify),
    }
}

fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();

    if cli.debug {
        // SAFETY: We're the only thread at this point (start of main)
        unsafe { std::env::set_var("RUST_BACKTRACE", "1") };
    }
    init_logging(cli.debug);

    if let Err(err) = run(cli) {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}
