//! Envelope interpretation for procedure-call responses
//!
//! Turns one raw HTTP response (body + status) into a normalized [`Outcome`]
//! without ever raising: an unparseable or unrecognized body is itself a
//! classified failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Maximum number of body bytes echoed into a malformed-response message
pub const MALFORMED_PREVIEW_BYTES: usize = 200;

/// Message substituted when an error envelope carries no usable message
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// Classified failure kind, derived purely from response shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The endpoint requires authentication
    AuthRequired,
    /// The input failed server-side validation
    Validation,
    /// The requested resource or procedure does not exist
    NotFound,
    /// Connection, DNS, or timeout failure below the HTTP layer
    Transport,
    /// The body could not be parsed as a structured envelope
    MalformedResponse,
    /// Error envelope with an unrecognized message
    Unknown,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::AuthRequired => write!(f, "auth_required"),
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::NotFound => write!(f, "not_found"),
            ErrorKind::Transport => write!(f, "transport"),
            ErrorKind::MalformedResponse => write!(f, "malformed_response"),
            ErrorKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// Normalized result of one procedure call
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The service answered with a success envelope; `payload` is the inner
    /// data object, unchanged
    Success { payload: Value },
    /// The call failed, at transport level or through an error envelope
    Failure { kind: ErrorKind, message: String },
}

impl Outcome {
    /// Failure at the transport layer, before any envelope existed
    pub fn transport(message: impl Into<String>) -> Self {
        Outcome::Failure {
            kind: ErrorKind::Transport,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    /// Failure kind, if this outcome is a failure
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Outcome::Success { .. } => None,
            Outcome::Failure { kind, .. } => Some(*kind),
        }
    }
}

/// Interpret one raw response body into an [`Outcome`].
///
/// The HTTP status is recorded for diagnostics only; classification is a
/// function of the body alone, so an error envelope on a 200 and the same
/// envelope on a 401 interpret identically.
pub fn interpret(body: &str, status: u16) -> Outcome {
    debug!(status, bytes = body.len(), "interpreting response envelope");

    let value: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => {
            return Outcome::Failure {
                kind: ErrorKind::MalformedResponse,
                message: format!("invalid JSON response: {}", preview(body)),
            };
        }
    };

    // Success envelope: { result: { data: { success: true, ... } } }
    if let Some(data) = value.pointer("/result/data") {
        if data.get("success").and_then(Value::as_bool) == Some(true) {
            return Outcome::Success {
                payload: data.clone(),
            };
        }
    }

    // Error envelope: { error: { json: { message: ... } } }
    if let Some(error) = value.get("error") {
        let message = error
            .pointer("/json/message")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_ERROR_MESSAGE)
            .to_string();
        return Outcome::Failure {
            kind: classify_message(&message),
            message,
        };
    }

    // Parsed, but neither shape (including an inner success flag that is
    // false or missing).
    Outcome::Failure {
        kind: ErrorKind::Unknown,
        message: UNKNOWN_ERROR_MESSAGE.to_string(),
    }
}

/// Classify an error-envelope message into an [`ErrorKind`].
///
/// Total and purely textual: case-insensitive substring checks in a fixed
/// order, falling through to [`ErrorKind::Unknown`].
pub fn classify_message(message: &str) -> ErrorKind {
    let lower = message.to_lowercase();

    if lower.contains("unauthor") || lower.contains("authentic") {
        ErrorKind::AuthRequired
    } else if lower.contains("database") || lower.contains("connection") {
        ErrorKind::Transport
    } else if lower.contains("valid") {
        ErrorKind::Validation
    } else if lower.contains("not found") {
        ErrorKind::NotFound
    } else {
        ErrorKind::Unknown
    }
}

/// First [`MALFORMED_PREVIEW_BYTES`] of a body, cut on a char boundary
fn preview(body: &str) -> &str {
    if body.len() <= MALFORMED_PREVIEW_BYTES {
        return body;
    }
    let mut end = MALFORMED_PREVIEW_BYTES;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
