//! Conformance run command

use clap::Args;
use probinator_client::HttpSurface;
use probinator_core::{
    GradingPolicy, HarnessConfig, OutputFormat, ProbeResult, ProgressReporter, RunState,
    RunSummary, Verdict,
};
use probinator_engine::{format_json, format_text, write_report, PlanRunner, RunContext};
use probinator_probes::{build_plan, PlanOptions};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

#[derive(Args)]
pub struct RunArgs {
    /// Base URL of the server under test
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Server log file scanned for issued verification codes
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Where to write the JSON report
    #[arg(long)]
    report_path: Option<PathBuf>,

    /// Grading policy (strict, lenient)
    #[arg(long)]
    grading: Option<GradingPolicy>,

    /// Load settings from a JSON or YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip the signup/verification/login flow
    #[arg(long)]
    skip_auth_flow: bool,

    /// Skip the authorization gating probes
    #[arg(long)]
    skip_gating: bool,

    /// Skip the transcript tool presence probe
    #[arg(long)]
    skip_tooling: bool,

    /// Skip the procedure availability probe
    #[arg(long)]
    skip_availability: bool,
}

/// Progress reporter that prints one line per finished probe
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn run_started(&self, total_probes: usize) {
        println!("Running {total_probes} probes...\n");
    }

    fn probe_started(&self, _name: &str) {}

    fn probe_finished(&self, result: &ProbeResult) {
        let status = if result.passed { "✅ PASS" } else { "❌ FAIL" };
        println!("{} - {}: {}", status, result.probe, result.message);
    }

    fn run_halted(&self, failed_probe: &str) {
        println!("\n🛑 {failed_probe} failed. Stopping remaining probes.");
    }

    fn run_completed(&self, _summary: &RunSummary) {}
}

pub fn run(args: RunArgs, format: OutputFormat) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => HarnessConfig::from_file(path)?,
        None => HarnessConfig::default(),
    };

    // Flags override file values
    if let Some(base_url) = args.base_url {
        config.target.base_url = base_url;
    }
    if let Some(timeout) = args.timeout {
        config.target.timeout_secs = timeout;
    }
    if let Some(log_file) = args.log_file {
        config.discovery.log_path = Some(log_file);
    }
    if let Some(report_path) = args.report_path {
        config.report.path = report_path;
    }
    if let Some(grading) = args.grading {
        config.grading = grading;
    }

    let options = PlanOptions {
        skip_auth_flow: args.skip_auth_flow,
        skip_gating: args.skip_gating,
        skip_tooling: args.skip_tooling,
        skip_availability: args.skip_availability,
    };
    let plan = build_plan(&options);

    println!("Probinator Conformance Run");
    println!("==========================\n");
    println!("Target: {}", config.target.base_url);

    let grading = config.grading;
    let report_path = config.report.path.clone();

    let surface = HttpSurface::new(&config.target)?;
    let ctx = RunContext::new(Box::new(surface), config);
    let mut state = RunState::new();

    let mut runner = PlanRunner::new()
        .with_grading(grading)
        .with_progress(Arc::new(ConsoleReporter));
    let report = runner.run(&plan, &ctx, &mut state);

    // A sink failure never changes the verdict or the exit code
    if let Err(e) = write_report(&report, &report_path) {
        warn!(path = %report_path.display(), error = %e, "failed to write report");
    }

    match format {
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let json = format_json(&report, format == OutputFormat::JsonPretty)?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            let text = format_text(&report);
            println!("\n{}", text);
        }
    }

    if report.verdict == Verdict::Fail {
        std::process::exit(1);
    }

    Ok(())
}
