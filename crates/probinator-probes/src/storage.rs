//! Storage-layer reachability inferred from unauthenticated reads

use probinator_core::{ErrorKind, Outcome, Probe, ProbeContext, ProbeResult, RunState};
use serde_json::json;

/// Soft probe: did the storage layer behind the service answer?
///
/// Calls an authenticated-read procedure with no credentials. An auth or
/// validation rejection is evidence the storage layer itself responded; only
/// a transport-classified failure (connection or database trouble) fails.
pub struct DatabaseReachabilityProbe;

impl Probe for DatabaseReachabilityProbe {
    fn name(&self) -> &str {
        "database-reachability"
    }

    fn description(&self) -> &str {
        "Infers database reachability from an unauthenticated read of auth.me"
    }

    fn execute(&self, ctx: &dyn ProbeContext, _state: &mut RunState) -> ProbeResult {
        match ctx.surface().query("auth.me", &json!({})) {
            Outcome::Success { .. } => {
                ProbeResult::pass(self.name(), "database connection successful")
            }
            Outcome::Failure { kind, message } if kind == ErrorKind::Transport => {
                ProbeResult::fail(self.name(), format!("database connection issue: {message}"))
                    .with_detail("kind", json!(kind))
            }
            Outcome::Failure { kind, .. } => ProbeResult::pass(
                self.name(),
                "database is accessible (auth error expected)",
            )
            .with_detail("kind", json!(kind)),
        }
    }
}
