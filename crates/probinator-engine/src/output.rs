//! Output formatting and report persistence

use probinator_core::{Result, RunReport};
use std::path::Path;
use tracing::info;

const BANNER: &str = "======================================================================";

/// Format a run report as the human-readable summary block
pub fn format_text(report: &RunReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("{BANNER}\n📊 TEST SUMMARY\n{BANNER}\n"));
    output.push_str(&format!("Target: {}\n", report.target));
    output.push_str(&format!("Plan: {}\n", report.plan_outcome));
    output.push_str(&format!("Total Probes: {}\n", report.summary.total));
    output.push_str(&format!("Passed: {}\n", report.summary.passed));
    output.push_str(&format!("Failed: {}\n", report.summary.failed));
    output.push_str(&format!("Pass Rate: {:.1}%\n", report.summary.pass_rate));
    output.push_str(&format!("Grading: {}\n", report.grading));
    output.push_str(&format!(
        "Verdict: {}\n",
        report.verdict.to_string().to_uppercase()
    ));

    let failed: Vec<_> = report.results.iter().filter(|r| !r.passed).collect();
    if !failed.is_empty() {
        output.push_str(&format!("\n❌ FAILED PROBES ({}):\n", failed.len()));
        for result in failed {
            output.push_str(&format!("  - {}: {}\n", result.probe, result.message));
        }
    }

    let passed: Vec<_> = report.results.iter().filter(|r| r.passed).collect();
    if !passed.is_empty() {
        output.push_str(&format!("\n✅ PASSED PROBES ({}):\n", passed.len()));
        for result in passed {
            output.push_str(&format!("  - {}: {}\n", result.probe, result.message));
        }
    }

    output
}

/// Format a run report as JSON
pub fn format_json(report: &RunReport, pretty: bool) -> Result<String> {
    if pretty {
        serde_json::to_string_pretty(report).map_err(Into::into)
    } else {
        serde_json::to_string(report).map_err(Into::into)
    }
}

/// Write the report document to the sink path, creating parent directories.
///
/// Callers treat a sink failure as loggable, not fatal; it never changes the
/// computed verdict or exit code.
pub fn write_report(report: &RunReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, format_json(report, true)?)?;
    info!(path = %path.display(), "report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use probinator_core::{GradingPolicy, PlanOutcome, ProbeResult, RunReport};

    fn sample_report() -> RunReport {
        RunReport::new(
            chrono::Utc::now(),
            "http://localhost:3000",
            PlanOutcome::Completed,
            GradingPolicy::Lenient,
            vec![
                ProbeResult::pass("server-connectivity", "server responding (HTTP 200)"),
                ProbeResult::pass("database-reachability", "database is accessible"),
                ProbeResult::fail("session-login", "login failed: Invalid token"),
            ],
        )
    }

    #[test]
    fn text_summary_contains_counts_and_verdict() {
        let text = format_text(&sample_report());
        assert!(text.contains("📊 TEST SUMMARY"));
        assert!(text.contains("Total Probes: 3"));
        assert!(text.contains("Passed: 2"));
        assert!(text.contains("Failed: 1"));
        assert!(text.contains("Pass Rate: 66.7%"));
        assert!(text.contains("Verdict: FAIL"));
        assert!(text.contains("❌ FAILED PROBES (1):"));
        assert!(text.contains("  - session-login: login failed: Invalid token"));
        assert!(text.contains("✅ PASSED PROBES (2):"));
    }

    #[test]
    fn all_passing_report_omits_failed_section() {
        let report = RunReport::new(
            chrono::Utc::now(),
            "http://localhost:3000",
            PlanOutcome::Completed,
            GradingPolicy::Strict,
            vec![ProbeResult::pass("only", "ok")],
        );
        let text = format_text(&report);
        assert!(!text.contains("FAILED PROBES"));
        assert!(text.contains("Verdict: PASS"));
    }

    #[test]
    fn json_roundtrips_through_the_sink() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports/nested/conformance.json");

        write_report(&sample_report(), &path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let loaded: RunReport = serde_json::from_str(&raw).unwrap();
        assert_eq!(loaded.summary.total, 3);
        assert_eq!(loaded.summary.failed_probes, vec!["session-login"]);
        assert_eq!(loaded.target, "http://localhost:3000");
    }

    #[test]
    fn compact_and_pretty_json_both_parse() {
        let report = sample_report();
        let compact = format_json(&report, false).unwrap();
        let pretty = format_json(&report, true).unwrap();
        assert!(!compact.contains('\n'));
        assert!(pretty.contains('\n'));
        assert!(serde_json::from_str::<RunReport>(&compact).is_ok());
    }
}
