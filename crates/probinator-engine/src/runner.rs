//! Plan runner that orchestrates probe execution

use probinator_core::{
    CallSurface, GradingPolicy, HarnessConfig, NullProgressReporter, Plan, PlanOutcome,
    ProbeContext, ProgressReporter, RunReport, RunState,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Execution context handed to every probe in a run
pub struct RunContext {
    surface: Box<dyn CallSurface>,
    config: HarnessConfig,
}

impl RunContext {
    pub fn new(surface: Box<dyn CallSurface>, config: HarnessConfig) -> Self {
        Self { surface, config }
    }
}

impl ProbeContext for RunContext {
    fn surface(&self) -> &dyn CallSurface {
        self.surface.as_ref()
    }

    fn config(&self) -> &HarnessConfig {
        &self.config
    }
}

/// Execution phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Run has not started
    Pending,
    /// Probes are executing
    Running,
    /// A hard-stop probe failed; the remaining plan was abandoned
    HaltedByHardStop,
    /// Every planned probe executed
    Completed,
}

/// Sequential runner over an ordered plan.
///
/// Executes each probe to completion before the next starts, threading one
/// `RunState` through the whole run. A failing soft probe is recorded and the
/// run continues; a failing hard-stop probe halts it. Probes are never
/// retried at this layer.
pub struct PlanRunner {
    grading: GradingPolicy,
    progress: Arc<dyn ProgressReporter>,
    phase: RunPhase,
}

impl PlanRunner {
    pub fn new() -> Self {
        Self {
            grading: GradingPolicy::default(),
            progress: Arc::new(NullProgressReporter),
            phase: RunPhase::Pending,
        }
    }

    /// Set the grading policy for the final verdict
    pub fn with_grading(mut self, grading: GradingPolicy) -> Self {
        self.grading = grading;
        self
    }

    /// Set the progress reporter
    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Current phase of this runner
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Execute the plan and assemble the graded report
    pub fn run(&mut self, plan: &Plan, ctx: &RunContext, state: &mut RunState) -> RunReport {
        let started_at = chrono::Utc::now();
        self.phase = RunPhase::Running;
        info!(
            probes = plan.len(),
            target = %ctx.config.target.base_url,
            "starting conformance run"
        );
        self.progress.run_started(plan.len());

        let mut results = Vec::new();
        for probe in plan.iter() {
            self.progress.probe_started(probe.name());
            debug!(probe = probe.name(), "executing probe");

            let result = probe.execute(ctx, state);
            self.progress.probe_finished(&result);
            if !result.passed {
                warn!(probe = %result.probe, message = %result.message, "probe failed");
            }

            let halt = !result.passed && probe.hard_stop();
            results.push(result);
            if halt {
                self.phase = RunPhase::HaltedByHardStop;
                self.progress.run_halted(probe.name());
                warn!(probe = probe.name(), "hard-stop probe failed, halting run");
                break;
            }
        }
        if self.phase == RunPhase::Running {
            self.phase = RunPhase::Completed;
        }

        let plan_outcome = match self.phase {
            RunPhase::HaltedByHardStop => PlanOutcome::HaltedByHardStop,
            _ => PlanOutcome::Completed,
        };
        let report = RunReport::new(
            started_at,
            ctx.config.target.base_url.clone(),
            plan_outcome,
            self.grading,
            results,
        );
        self.progress.run_completed(&report.summary);
        info!(
            passed = report.summary.passed,
            failed = report.summary.failed,
            verdict = %report.verdict,
            "run finished"
        );
        report
    }
}

impl Default for PlanRunner {
    fn default() -> Self {
        Self::new()
    }
}
