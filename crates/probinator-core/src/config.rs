//! Configuration structures for the probinator harness

use crate::report::GradingPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration for a harness run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Service under test
    #[serde(default)]
    pub target: TargetConfig,

    /// Verification-code discovery settings
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// Report sink settings
    #[serde(default)]
    pub report: ReportConfig,

    /// Grading policy for the final verdict
    #[serde(default)]
    pub grading: GradingPolicy,
}

/// Settings describing the service under test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Base URL of the service, without a trailing procedure path
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl TargetConfig {
    /// Per-request timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("probinator/{}", env!("CARGO_PKG_VERSION"))
}

/// Verification-code discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Service log file to scan for issued codes, if one is available
    pub log_path: Option<PathBuf>,

    /// How many trailing log lines the capture window covers
    #[serde(default = "default_window_lines")]
    pub window_lines: usize,

    /// Well-known codes to try when no stronger source yields one
    #[serde(default = "default_fallback_codes")]
    pub fallback_codes: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            log_path: None,
            window_lines: default_window_lines(),
            fallback_codes: default_fallback_codes(),
        }
    }
}

fn default_window_lines() -> usize {
    50
}

fn default_fallback_codes() -> Vec<String> {
    ["123456", "000000", "111111", "222222", "555555", "999999"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Report sink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Where the JSON report document is written
    #[serde(default = "default_report_path")]
    pub path: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            path: default_report_path(),
        }
    }
}

fn default_report_path() -> PathBuf {
    PathBuf::from("test_reports/conformance_report.json")
}

impl HarnessConfig {
    /// Load configuration from a file
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;

        if path.extension().map(|e| e == "json").unwrap_or(false) {
            serde_json::from_str(&content).map_err(|e| crate::error::HarnessError::Parse {
                context: path.display().to_string(),
                message: e.to_string(),
            })
        } else {
            // Assume YAML for other extensions
            serde_yaml::from_str(&content).map_err(|e| crate::error::HarnessError::Parse {
                context: path.display().to_string(),
                message: e.to_string(),
            })
        }
    }

    /// Save configuration to a file
    pub fn to_file(&self, path: &std::path::Path) -> crate::error::Result<()> {
        let content = if path.extension().map(|e| e == "json").unwrap_or(false) {
            serde_json::to_string_pretty(self)?
        } else {
            serde_yaml::to_string(self)
                .map_err(|e| crate::error::HarnessError::Serialization(e.to_string()))?
        };

        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_local_dev_target() {
        let config = HarnessConfig::default();
        assert_eq!(config.target.base_url, "http://localhost:3000");
        assert_eq!(config.target.timeout(), Duration::from_secs(10));
        assert_eq!(config.discovery.window_lines, 50);
        assert_eq!(config.discovery.fallback_codes[0], "123456");
        assert_eq!(config.grading, GradingPolicy::Lenient);
        assert_eq!(
            config.report.path,
            PathBuf::from("test_reports/conformance_report.json")
        );
    }

    #[test]
    fn loads_yaml_with_partial_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harness.yaml");
        std::fs::write(
            &path,
            "target:\n  base_url: http://10.0.0.5:8080\ngrading: strict\n",
        )
        .unwrap();

        let config = HarnessConfig::from_file(&path).unwrap();
        assert_eq!(config.target.base_url, "http://10.0.0.5:8080");
        assert_eq!(config.target.timeout_secs, 10);
        assert_eq!(config.grading, GradingPolicy::Strict);
    }

    #[test]
    fn loads_json_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harness.json");
        std::fs::write(
            &path,
            r#"{"discovery":{"log_path":"/var/log/backend.log","window_lines":20}}"#,
        )
        .unwrap();

        let config = HarnessConfig::from_file(&path).unwrap();
        assert_eq!(
            config.discovery.log_path,
            Some(PathBuf::from("/var/log/backend.log"))
        );
        assert_eq!(config.discovery.window_lines, 20);
        assert_eq!(config.target.base_url, "http://localhost:3000");
    }

    #[test]
    fn roundtrips_through_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.yaml");
        let mut config = HarnessConfig::default();
        config.target.base_url = "http://example.test".to_string();
        config.to_file(&path).unwrap();

        let loaded = HarnessConfig::from_file(&path).unwrap();
        assert_eq!(loaded.target.base_url, "http://example.test");
    }

    #[test]
    fn malformed_file_reports_parse_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = HarnessConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("bad.json"));
    }
}
