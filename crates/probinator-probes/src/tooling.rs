//! Presence checks for external transcript tooling

use probinator_core::{Probe, ProbeContext, ProbeResult, RunState};
use serde_json::json;
use std::path::PathBuf;

/// Utilities the transcript pipeline shells out to
pub const TRANSCRIPT_TOOLS: &[&str] = &["yt-dlp", "ffmpeg"];

/// Locate an executable by name on the current PATH
pub fn find_on_path(tool: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&path) {
        let candidate = dir.join(tool);
        if candidate.is_file() {
            return Some(candidate);
        }
        #[cfg(windows)]
        {
            let candidate = dir.join(format!("{tool}.exe"));
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }
    None
}

/// Soft probe: are the media download/decode utilities installed?
pub struct ToolPresenceProbe {
    tools: Vec<String>,
}

impl ToolPresenceProbe {
    pub fn new() -> Self {
        Self {
            tools: TRANSCRIPT_TOOLS.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Override the tool list (used by tests)
    pub fn with_tools(tools: Vec<String>) -> Self {
        Self { tools }
    }
}

impl Default for ToolPresenceProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl Probe for ToolPresenceProbe {
    fn name(&self) -> &str {
        "transcript-tool-presence"
    }

    fn description(&self) -> &str {
        "Checks that the external transcript utilities are on PATH"
    }

    fn execute(&self, _ctx: &dyn ProbeContext, _state: &mut RunState) -> ProbeResult {
        let mut missing = Vec::new();
        let mut result_details = Vec::new();

        for tool in &self.tools {
            match find_on_path(tool) {
                Some(path) => result_details.push((tool.clone(), json!(path.display().to_string()))),
                None => {
                    result_details.push((tool.clone(), json!(null)));
                    missing.push(tool.clone());
                }
            }
        }

        let mut result = if missing.is_empty() {
            ProbeResult::pass(self.name(), "all transcript tools present")
        } else {
            ProbeResult::fail(
                self.name(),
                format!("missing transcript tools: {}", missing.join(", ")),
            )
        };
        for (tool, detail) in result_details {
            result = result.with_detail(tool, detail);
        }
        result
    }
}
