//! Probinator Client
//!
//! Blocking HTTP implementation of the [`CallSurface`] seam. Procedures map
//! onto `{base_url}/api/trpc/{procedure}`: queries as GET with the JSON input
//! URL-encoded into an `input` parameter, mutations as POST with a JSON body.
//! Every transport-level failure is folded into a failure outcome, so callers
//! never see a panic or an error from a procedure call.

use probinator_core::{interpret, CallSurface, HarnessError, Outcome, Result, TargetConfig};
use serde_json::Value;
use tracing::debug;

/// Call surface backed by a blocking HTTP client
pub struct HttpSurface {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpSurface {
    /// Build a surface for the configured target
    pub fn new(config: &TargetConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| HarnessError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL, normalized without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn procedure_url(&self, procedure: &str) -> String {
        format!("{}/api/trpc/{}", self.base_url, procedure)
    }

    fn dispatch(&self, response: reqwest::Result<reqwest::blocking::Response>) -> Outcome {
        let response = match response {
            Ok(r) => r,
            Err(e) => return Outcome::transport(e.to_string()),
        };
        let status = response.status().as_u16();
        let body = match response.text() {
            Ok(b) => b,
            Err(e) => return Outcome::transport(format!("failed to read response body: {e}")),
        };
        interpret(&body, status)
    }
}

impl CallSurface for HttpSurface {
    fn reach(&self) -> Result<u16> {
        debug!(url = %self.base_url, "reachability request");
        let response = self
            .client
            .get(&self.base_url)
            .send()
            .map_err(|e| HarnessError::Network(e.to_string()))?;
        Ok(response.status().as_u16())
    }

    fn query(&self, procedure: &str, input: &Value) -> Outcome {
        debug!(procedure, "query");
        self.dispatch(
            self.client
                .get(self.procedure_url(procedure))
                .query(&[("input", input.to_string())])
                .send(),
        )
    }

    fn mutate(&self, procedure: &str, input: &Value) -> Outcome {
        debug!(procedure, "mutate");
        self.dispatch(self.client.post(self.procedure_url(procedure)).json(input).send())
    }
}
