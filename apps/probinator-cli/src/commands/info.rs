//! Resolved configuration and environment command

use clap::Args;
use probinator_core::HarnessConfig;
use probinator_probes::{find_on_path, TRANSCRIPT_TOOLS};
use std::path::PathBuf;

#[derive(Args)]
pub struct InfoArgs {
    /// Resolve settings from a JSON or YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => HarnessConfig::from_file(path)?,
        None => HarnessConfig::default(),
    };

    println!("Probinator Configuration");
    println!("========================\n");

    println!("Target: {}", config.target.base_url);
    println!("Timeout: {}s", config.target.timeout_secs);
    println!("User-Agent: {}", config.target.user_agent);

    match &config.discovery.log_path {
        Some(path) => println!("Server log: {}", path.display()),
        None => println!("Server log: (none)"),
    }
    println!("Log window: {} lines", config.discovery.window_lines);
    println!(
        "Fallback guesses: {}",
        config.discovery.fallback_codes.join(", ")
    );

    println!("Report sink: {}", config.report.path.display());
    println!("Grading: {}", config.grading);

    println!("\nTranscript tools:");
    for tool in TRANSCRIPT_TOOLS {
        match find_on_path(tool) {
            Some(path) => println!("  - {}: {}", tool, path.display()),
            None => println!("  - {}: not found", tool),
        }
    }

    Ok(())
}
