//! Report types for probe results and run verdicts

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Outcome of one probe execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    /// Name of the probe that produced this result
    pub probe: String,

    /// Whether the probe's predicate held
    pub passed: bool,

    /// Human-readable explanation of the result
    pub message: String,

    /// Additional structured data (captured codes, payload fragments, etc.)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub details: HashMap<String, serde_json::Value>,

    /// When the probe finished
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl ProbeResult {
    /// Create a passing result
    pub fn pass(probe: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            probe: probe.into(),
            passed: true,
            message: message.into(),
            details: HashMap::new(),
            timestamp: chrono::Utc::now(),
        }
    }

    /// Create a failing result
    pub fn fail(probe: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            probe: probe.into(),
            passed: false,
            message: message.into(),
            details: HashMap::new(),
            timestamp: chrono::Utc::now(),
        }
    }

    /// Attach a structured detail
    pub fn with_detail(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.details.insert(key.into(), value);
        self
    }
}

/// Aggregate counts over a set of probe results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Total number of probes that executed
    pub total: usize,

    /// Number of probes that passed
    pub passed: usize,

    /// Number of probes that failed
    pub failed: usize,

    /// Percentage of probes that passed (0.0 for an empty run)
    pub pass_rate: f64,

    /// Names of passing probes, in execution order
    pub passed_probes: Vec<String>,

    /// Names of failing probes, in execution order
    pub failed_probes: Vec<String>,
}

impl RunSummary {
    /// Compute a summary over executed results
    pub fn from_results(results: &[ProbeResult]) -> Self {
        let total = results.len();
        let mut passed_probes = Vec::new();
        let mut failed_probes = Vec::new();
        for result in results {
            if result.passed {
                passed_probes.push(result.probe.clone());
            } else {
                failed_probes.push(result.probe.clone());
            }
        }
        let passed = passed_probes.len();
        let failed = failed_probes.len();
        let pass_rate = if total == 0 {
            0.0
        } else {
            passed as f64 / total as f64 * 100.0
        };
        Self {
            total,
            passed,
            failed,
            pass_rate,
            passed_probes,
            failed_probes,
        }
    }
}

/// Policy deciding how many probe failures a run tolerates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradingPolicy {
    /// Every executed probe must pass
    Strict,
    /// At least 70% of executed probes must pass
    #[default]
    Lenient,
}

impl GradingPolicy {
    /// Judge a summary under this policy
    pub fn judge(&self, summary: &RunSummary) -> Verdict {
        let passing = match self {
            GradingPolicy::Strict => summary.passed == summary.total,
            GradingPolicy::Lenient => summary.passed >= (summary.total * 7).div_ceil(10),
        };
        if passing {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }
}

impl std::fmt::Display for GradingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GradingPolicy::Strict => write!(f, "strict"),
            GradingPolicy::Lenient => write!(f, "lenient"),
        }
    }
}

impl std::str::FromStr for GradingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(GradingPolicy::Strict),
            "lenient" => Ok(GradingPolicy::Lenient),
            other => Err(format!("unknown grading policy '{other}' (expected strict or lenient)")),
        }
    }
}

/// Overall judgement of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// The run met the grading policy's bar
    Pass,
    /// The run fell short of the grading policy's bar
    Fail,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Pass => write!(f, "pass"),
            Verdict::Fail => write!(f, "fail"),
        }
    }
}

/// How the plan terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanOutcome {
    /// Every planned probe executed
    Completed,
    /// A hard-stop probe failed and the remainder was skipped
    HaltedByHardStop,
}

impl std::fmt::Display for PlanOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanOutcome::Completed => write!(f, "completed"),
            PlanOutcome::HaltedByHardStop => write!(f, "halted_by_hard_stop"),
        }
    }
}

/// Complete record of one harness run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// When the run started
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// When the run completed
    pub completed_at: chrono::DateTime<chrono::Utc>,

    /// Base URL of the service under test
    pub target: String,

    /// Whether the plan completed or halted early
    pub plan_outcome: PlanOutcome,

    /// Grading policy applied to the summary
    pub grading: GradingPolicy,

    /// Judgement under the grading policy
    pub verdict: Verdict,

    /// Aggregate counts
    pub summary: RunSummary,

    /// Per-probe results, in execution order
    pub results: Vec<ProbeResult>,
}

impl RunReport {
    /// Assemble a report from executed results
    pub fn new(
        started_at: chrono::DateTime<chrono::Utc>,
        target: impl Into<String>,
        plan_outcome: PlanOutcome,
        grading: GradingPolicy,
        results: Vec<ProbeResult>,
    ) -> Self {
        let summary = RunSummary::from_results(&results);
        let verdict = grading.judge(&summary);
        Self {
            started_at,
            completed_at: chrono::Utc::now(),
            target: target.into(),
            plan_outcome,
            grading,
            verdict,
            summary,
            results,
        }
    }
}
