//! Plan listing command

use clap::Args;
use probinator_core::{OutputFormat, StateField};
use probinator_probes::{build_plan, PlanOptions};
use serde_json::json;

#[derive(Args)]
pub struct PlanArgs {
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

pub fn run(args: PlanArgs, format: OutputFormat) -> anyhow::Result<()> {
    let options = PlanOptions {
        skip_auth_flow: args.skip_auth_flow,
        skip_gating: args.skip_gating,
        skip_tooling: args.skip_tooling,
        skip_availability: args.skip_availability,
    };
    let plan = build_plan(&options);

    match format {
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let entries: Vec<_> = plan
                .iter()
                .map(|probe| {
                    json!({
                        "name": probe.name(),
                        "description": probe.description(),
                        "hard_stop": probe.hard_stop(),
                        "reads": field_names(&probe.reads()),
                        "writes": field_names(&probe.writes()),
                    })
                })
                .collect();
            let rendered = if format == OutputFormat::JsonPretty {
                serde_json::to_string_pretty(&entries)?
            } else {
                serde_json::to_string(&entries)?
            };
            println!("{}", rendered);
        }
        OutputFormat::Text => {
            println!("Probinator Conformance Plan");
            println!("===========================\n");

            for (idx, probe) in plan.iter().enumerate() {
                let stop = if probe.hard_stop() { " [hard stop]" } else { "" };
                println!("{}. {}{}", idx + 1, probe.name(), stop);
                println!("   {}", probe.description());

                let reads = probe.reads();
                if !reads.is_empty() {
                    println!("   reads: {}", field_names(&reads).join(", "));
                }
                let writes = probe.writes();
                if !writes.is_empty() {
                    println!("   writes: {}", field_names(&writes).join(", "));
                }
            }

            println!("\n{} probes total", plan.len());
        }
    }

    Ok(())
}

fn field_names(fields: &[StateField]) -> Vec<String> {
    fields.iter().map(ToString::to_string).collect()
}
