//! Probinator Probes
//!
//! Concrete conformance probes for a tRPC-style backend, and construction of
//! the ordered plan the harness executes. Probes reduce everything the
//! service can do, including transport failures, to a single pass/fail
//! [`ProbeResult`](probinator_core::ProbeResult); only the connectivity probe
//! is a hard stop.
//!
//! # Example
//!
//! ```no_run
//! use probinator_probes::{build_plan, PlanOptions};
//!
//! let plan = build_plan(&PlanOptions::default());
//! for name in plan.names() {
//!     println!("{name}");
//! }
//! ```

pub mod auth;
pub mod connectivity;
pub mod gating;
pub mod storage;
pub mod tooling;

#[cfg(test)]
pub(crate) mod testutil;

pub use auth::{IssuanceProbe, LoginProbe, VerificationProbe, PLACEHOLDER_TOKEN};
pub use connectivity::{AvailabilityProbe, ConnectivityProbe};
pub use gating::GatingProbe;
pub use storage::DatabaseReachabilityProbe;
pub use tooling::{find_on_path, ToolPresenceProbe, TRANSCRIPT_TOOLS};

use probinator_core::Plan;

/// Which optional probe groups a plan includes
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanOptions {
    /// Skip the issuance/verification/login flow
    pub skip_auth_flow: bool,
    /// Skip the authorization-gating probes
    pub skip_gating: bool,
    /// Skip the external tool presence probe
    pub skip_tooling: bool,
    /// Skip the procedure-availability probe
    pub skip_availability: bool,
}

/// Build the standard plan, honoring the skip options.
///
/// Ordering is fixed: connectivity runs first as the sole hard stop, the
/// auth flow runs before the gating probes, and tool presence runs last.
pub fn build_plan(options: &PlanOptions) -> Plan {
    let mut plan = Plan::new();
    plan.push(Box::new(ConnectivityProbe));
    plan.push(Box::new(DatabaseReachabilityProbe));
    if !options.skip_availability {
        plan.push(Box::new(AvailabilityProbe::new()));
    }
    if !options.skip_auth_flow {
        plan.push(Box::new(IssuanceProbe));
        plan.push(Box::new(VerificationProbe));
        plan.push(Box::new(LoginProbe));
    }
    if !options.skip_gating {
        plan.push(Box::new(GatingProbe::knowledge_base()));
        plan.push(Box::new(GatingProbe::workspace()));
    }
    if !options.skip_tooling {
        plan.push(Box::new(ToolPresenceProbe::new()));
    }
    plan
}
