//! Core traits that define the probe abstraction layer.
//!
//! Probe implementations and the plan runner meet at these seams, so probes
//! can be exercised against a scripted call surface in tests.

use crate::config::HarnessConfig;
use crate::error::Result;
use crate::outcome::Outcome;
use crate::report::{ProbeResult, RunSummary};
use crate::state::{RunState, StateField};
use serde_json::Value;

/// Transport-level access to the service under test
pub trait CallSurface: Send + Sync {
    /// Issue a bare GET against the base URL.
    ///
    /// Returns the HTTP status if any response came back at all; an error
    /// means the service was unreachable at the transport level.
    fn reach(&self) -> Result<u16>;

    /// Invoke a read procedure. Transport failures surface as failure
    /// outcomes, never as panics or errors.
    fn query(&self, procedure: &str, input: &Value) -> Outcome;

    /// Invoke a write procedure. Same totality contract as [`query`].
    ///
    /// [`query`]: CallSurface::query
    fn mutate(&self, procedure: &str, input: &Value) -> Outcome;
}

/// Context provided to probes during execution
pub trait ProbeContext: Send + Sync {
    /// The call surface for the service under test
    fn surface(&self) -> &dyn CallSurface;

    /// Configuration for this run
    fn config(&self) -> &HarnessConfig;
}

/// One named conformance observation against the service
pub trait Probe: Send + Sync {
    /// Unique name, stable across runs
    fn name(&self) -> &str;

    /// What this probe verifies
    fn description(&self) -> &str;

    /// Whether a failure of this probe invalidates everything after it
    fn hard_stop(&self) -> bool {
        false
    }

    /// State fields this probe reads
    fn reads(&self) -> Vec<StateField> {
        Vec::new()
    }

    /// State fields this probe writes
    fn writes(&self) -> Vec<StateField> {
        Vec::new()
    }

    /// Execute the probe.
    ///
    /// Total: every condition the service can produce, including transport
    /// failures and garbage bodies, comes back as a pass or fail result.
    fn execute(&self, ctx: &dyn ProbeContext, state: &mut RunState) -> ProbeResult;
}

/// An ordered set of probes to execute
#[derive(Default)]
pub struct Plan {
    probes: Vec<Box<dyn Probe>>,
}

impl Plan {
    pub fn new() -> Self {
        Self { probes: Vec::new() }
    }

    /// Append a probe to the end of the plan
    pub fn push(&mut self, probe: Box<dyn Probe>) {
        self.probes.push(probe);
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Probes in execution order
    pub fn iter(&self) -> impl Iterator<Item = &dyn Probe> {
        self.probes.iter().map(Box::as_ref)
    }

    /// Probe names in execution order
    pub fn names(&self) -> Vec<String> {
        self.probes.iter().map(|p| p.name().to_string()).collect()
    }
}

/// Progress reporting abstraction for UI/CLI
pub trait ProgressReporter: Send + Sync {
    /// Called once before the first probe executes
    fn run_started(&self, total_probes: usize);

    /// Called as each probe begins
    fn probe_started(&self, name: &str);

    /// Called as each probe finishes
    fn probe_finished(&self, result: &ProbeResult);

    /// Called when a hard-stop failure abandons the rest of the plan
    fn run_halted(&self, failed_probe: &str);

    /// Called once after the last probe, halted or not
    fn run_completed(&self, summary: &RunSummary);
}

/// No-op progress reporter for silent operation
pub struct NullProgressReporter;

impl ProgressReporter for NullProgressReporter {
    fn run_started(&self, _total_probes: usize) {}
    fn probe_started(&self, _name: &str) {}
    fn probe_finished(&self, _result: &ProbeResult) {}
    fn run_halted(&self, _failed_probe: &str) {}
    fn run_completed(&self, _summary: &RunSummary) {}
}

/// Output format for run reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "json-pretty" => Ok(OutputFormat::JsonPretty),
            other => Err(format!(
                "unknown output format '{other}' (expected text, json, or json-pretty)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_format_parses_case_insensitively() {
        assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!(
            "json-pretty".parse::<OutputFormat>(),
            Ok(OutputFormat::JsonPretty)
        );
    }

    #[test]
    fn output_format_rejects_unknown_names() {
        let err = "yaml".parse::<OutputFormat>().unwrap_err();
        assert!(err.contains("yaml"));
    }
}
