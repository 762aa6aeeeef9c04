//! Authorization-gating probes for protected endpoints

use probinator_core::{ErrorKind, Outcome, Probe, ProbeContext, ProbeResult, RunState};
use serde_json::{json, Value};

/// Soft probe: does a protected endpoint reject unauthenticated access?
///
/// Passes when the endpoint either demands authentication or answers
/// successfully (intentionally public); any other failure kind fails.
pub struct GatingProbe {
    name: &'static str,
    description: &'static str,
    procedure: &'static str,
    use_query: bool,
    input: Value,
}

impl GatingProbe {
    /// Gating on the knowledge-base stats read
    pub fn knowledge_base() -> Self {
        Self {
            name: "knowledge-base-gating",
            description: "Checks that knowledge-base reads are gated behind authentication",
            procedure: "brain.getStats",
            use_query: true,
            input: json!({}),
        }
    }

    /// Gating on workspace creation, which fronts the transcript pipeline
    pub fn workspace() -> Self {
        Self {
            name: "workspace-gating",
            description: "Checks that workspace creation is gated behind authentication",
            procedure: "workspace.create",
            use_query: false,
            input: json!({
                "name": "Test Workspace",
                "nicheDescription": "Testing YouTube transcription",
            }),
        }
    }
}

impl Probe for GatingProbe {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn execute(&self, ctx: &dyn ProbeContext, _state: &mut RunState) -> ProbeResult {
        let outcome = if self.use_query {
            ctx.surface().query(self.procedure, &self.input)
        } else {
            ctx.surface().mutate(self.procedure, &self.input)
        };
        match outcome {
            Outcome::Success { .. } => {
                ProbeResult::pass(self.name, "endpoint accessible without credentials")
            }
            Outcome::Failure { kind, .. } if kind == ErrorKind::AuthRequired => {
                ProbeResult::pass(self.name, "endpoint requires authentication (correct behavior)")
            }
            Outcome::Failure { kind, message } => {
                ProbeResult::fail(self.name, format!("unexpected error: {message}"))
                    .with_detail("kind", json!(kind))
            }
        }
    }
}
