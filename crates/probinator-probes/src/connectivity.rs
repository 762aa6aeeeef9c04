//! Reachability and surface-availability probes

use probinator_core::{Probe, ProbeContext, ProbeResult, RunState};
use serde_json::{json, Value};
use tracing::debug;

/// Hard-stop probe: is the server answering HTTP at all?
///
/// Any bounded status counts, including 404 and 500; only a connection-level
/// failure (refused, DNS, timeout) fails this probe.
pub struct ConnectivityProbe;

impl Probe for ConnectivityProbe {
    fn name(&self) -> &str {
        "server-connectivity"
    }

    fn description(&self) -> &str {
        "Verifies the server answers HTTP requests on its base URL"
    }

    fn hard_stop(&self) -> bool {
        true
    }

    fn execute(&self, ctx: &dyn ProbeContext, _state: &mut RunState) -> ProbeResult {
        match ctx.surface().reach() {
            Ok(status) => ProbeResult::pass(self.name(), format!("server responding (HTTP {status})"))
                .with_detail("status", json!(status)),
            Err(e) => ProbeResult::fail(self.name(), format!("connection error: {e}")),
        }
    }
}

/// Procedures the availability probe exercises, with their access mode
const AVAILABILITY_PROCEDURES: &[(&str, bool)] = &[
    ("auth.sendVerificationCode", false),
    ("auth.verifyCode", false),
    ("auth.supabaseLogin", false),
    ("auth.me", true),
];

/// Soft probe: do the auth procedures answer at all?
///
/// Each procedure is called with an empty input; any outcome other than a
/// transport failure (validation and auth errors included) counts as an
/// answer. Passes when at least `threshold` procedures answer.
pub struct AvailabilityProbe {
    threshold: usize,
}

impl AvailabilityProbe {
    pub fn new() -> Self {
        Self { threshold: 3 }
    }
}

impl Default for AvailabilityProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl Probe for AvailabilityProbe {
    fn name(&self) -> &str {
        "procedure-availability"
    }

    fn description(&self) -> &str {
        "Counts how many auth procedures respond to an empty-input call"
    }

    fn execute(&self, ctx: &dyn ProbeContext, _state: &mut RunState) -> ProbeResult {
        let empty = json!({});
        let mut answered = 0usize;
        let mut statuses: Vec<(&str, Value)> = Vec::new();

        for (procedure, is_query) in AVAILABILITY_PROCEDURES {
            let outcome = if *is_query {
                ctx.surface().query(procedure, &empty)
            } else {
                ctx.surface().mutate(procedure, &empty)
            };
            let answers = match outcome.kind() {
                None => true,
                Some(kind) => kind != probinator_core::ErrorKind::Transport,
            };
            debug!(procedure, answers, "availability call");
            if answers {
                answered += 1;
            }
            let label = match outcome.kind() {
                None => "ok".to_string(),
                Some(kind) => kind.to_string(),
            };
            statuses.push((procedure, json!(label)));
        }

        let total = AVAILABILITY_PROCEDURES.len();
        let message = format!("{answered}/{total} auth procedures answered");
        let mut result = if answered >= self.threshold {
            ProbeResult::pass(self.name(), message)
        } else {
            ProbeResult::fail(self.name(), message)
        };
        for (procedure, label) in statuses {
            result = result.with_detail(procedure, label);
        }
        result
    }
}
