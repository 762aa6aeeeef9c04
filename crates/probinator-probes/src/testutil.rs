//! Scripted call-surface fakes for probe tests

use probinator_core::{
    CallSurface, HarnessConfig, HarnessError, Outcome, ProbeContext, Result,
};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// One call a probe made against the scripted surface
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub procedure: String,
    pub input: Value,
}

/// In-memory call surface that replays scripted outcomes per procedure and
/// records every call it receives
pub struct ScriptedSurface {
    reach: std::result::Result<u16, String>,
    responses: Mutex<HashMap<String, VecDeque<Outcome>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedSurface {
    pub fn new() -> Self {
        Self {
            reach: Ok(200),
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_reach_status(status: u16) -> Self {
        let mut surface = Self::new();
        surface.reach = Ok(status);
        surface
    }

    pub fn with_reach_error(message: &str) -> Self {
        let mut surface = Self::new();
        surface.reach = Err(message.to_string());
        surface
    }

    /// Queue one outcome for the next call to `procedure`
    pub fn script(self, procedure: &str, outcome: Outcome) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry(procedure.to_string())
            .or_default()
            .push_back(outcome);
        self
    }

    /// Queue the same outcome `n` times for `procedure`
    pub fn script_n(mut self, procedure: &str, outcome: Outcome, n: usize) -> Self {
        for _ in 0..n {
            self = self.script(procedure, outcome.clone());
        }
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, procedure: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.procedure == procedure)
            .collect()
    }

    fn dispatch(&self, method: &'static str, procedure: &str, input: &Value) -> Outcome {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            procedure: procedure.to_string(),
            input: input.clone(),
        });
        self.responses
            .lock()
            .unwrap()
            .get_mut(procedure)
            .and_then(|queue| queue.pop_front())
            .unwrap_or_else(|| Outcome::Failure {
                kind: probinator_core::ErrorKind::Unknown,
                message: format!("unscripted call to {procedure}"),
            })
    }
}

impl CallSurface for ScriptedSurface {
    fn reach(&self) -> Result<u16> {
        self.reach
            .clone()
            .map_err(HarnessError::Network)
    }

    fn query(&self, procedure: &str, input: &Value) -> Outcome {
        self.dispatch("query", procedure, input)
    }

    fn mutate(&self, procedure: &str, input: &Value) -> Outcome {
        self.dispatch("mutate", procedure, input)
    }
}

/// Probe context over a scripted surface with a default or custom config
pub struct TestContext {
    pub surface: ScriptedSurface,
    pub config: HarnessConfig,
}

impl TestContext {
    pub fn new(surface: ScriptedSurface) -> Self {
        Self {
            surface,
            config: HarnessConfig::default(),
        }
    }

    pub fn with_config(surface: ScriptedSurface, config: HarnessConfig) -> Self {
        Self { surface, config }
    }
}

impl ProbeContext for TestContext {
    fn surface(&self) -> &dyn CallSurface {
        &self.surface
    }

    fn config(&self) -> &HarnessConfig {
        &self.config
    }
}

/// Success outcome with the given payload
pub fn ok(payload: Value) -> Outcome {
    Outcome::Success { payload }
}

/// Failure outcome with the given kind and message
pub fn err(kind: probinator_core::ErrorKind, message: &str) -> Outcome {
    Outcome::Failure {
        kind,
        message: message.to_string(),
    }
}
