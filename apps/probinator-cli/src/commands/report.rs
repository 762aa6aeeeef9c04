//! Saved report rendering command

use clap::Args;
use probinator_core::{OutputFormat, RunReport};
use probinator_engine::{format_json, format_text};
use std::fs;
use std::path::PathBuf;

#[derive(Args)]
pub struct ReportArgs {
    /// Path to a report document written by `probinator run`
    path: PathBuf,
}

pub fn run(args: ReportArgs, format: OutputFormat) -> anyhow::Result<()> {
    let raw = fs::read_to_string(&args.path)?;
    let report: RunReport = serde_json::from_str(&raw)?;

    match format {
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let json = format_json(&report, format == OutputFormat::JsonPretty)?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            let text = format_text(&report);
            println!("{}", text);
        }
    }

    Ok(())
}
