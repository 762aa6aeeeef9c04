//! Probinator CLI
//!
//! Black-box conformance testing for a tRPC-style backend.

mod commands;

use clap::{Parser, Subcommand};
use probinator_core::OutputFormat;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Probinator - a black-box backend conformance harness
#[derive(Parser)]
#[command(name = "probinator")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json, json-pretty)
    #[arg(short, long, global = true, default_value = "text")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute the conformance plan against a running server
    Run(commands::run::RunArgs),

    /// List the probes a run would execute
    Plan(commands::plan::PlanArgs),

    /// Render a previously written report document
    Report(commands::report::ReportArgs),

    /// Show the resolved configuration and tool availability
    Info(commands::info::InfoArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let format: OutputFormat = cli.format.parse().map_err(anyhow::Error::msg)?;

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    // An interrupted run is graded as a failure
    ctrlc::set_handler(|| {
        eprintln!("\n⚠️  run interrupted");
        std::process::exit(1);
    })?;

    match cli.command {
        Commands::Run(args) => commands::run::run(args, format),
        Commands::Plan(args) => commands::plan::run(args, format),
        Commands::Report(args) => commands::report::run(args, format),
        Commands::Info(args) => commands::info::run(args),
    }
}
