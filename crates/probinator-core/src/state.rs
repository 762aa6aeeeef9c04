//! Shared mutable state threaded through a probe run

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

static IDENTITY_SEQ: AtomicU64 = AtomicU64::new(0);

/// Password used for every generated identity
pub const IDENTITY_PASSWORD: &str = "TestPass123!";

/// Display name used for every generated identity
pub const IDENTITY_DISPLAY_NAME: &str = "Test User";

/// State slots a probe may read or write, used to declare data flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateField {
    /// The generated account identity
    Identity,
    /// The captured verification code
    VerificationSecret,
    /// The session token issued at login
    SessionToken,
}

impl std::fmt::Display for StateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateField::Identity => write!(f, "identity"),
            StateField::VerificationSecret => write!(f, "verification_secret"),
            StateField::SessionToken => write!(f, "session_token"),
        }
    }
}

/// Account identity a run registers and then authenticates as
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// Unique email address for this run
    pub email: String,

    /// Account password
    pub password: String,

    /// Account display name
    pub display_name: String,
}

impl Identity {
    /// Generate a fresh identity, unique across runs and within a process
    pub fn generate() -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let seq = IDENTITY_SEQ.fetch_add(1, Ordering::Relaxed);
        Self {
            email: format!("testuser+{millis}-{seq}@example.com"),
            password: IDENTITY_PASSWORD.to_string(),
            display_name: IDENTITY_DISPLAY_NAME.to_string(),
        }
    }
}

/// Where a verification code came from, ordered by trustworthiness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecretSource {
    /// Returned directly in the issuance payload
    IssuancePayload,
    /// Captured from the service's log output
    LogCapture,
    /// A well-known fallback guess that the service accepted
    FallbackGuess,
}

impl SecretSource {
    /// Relative strength; a stronger source displaces a weaker one
    pub fn strength(&self) -> u8 {
        match self {
            SecretSource::IssuancePayload => 3,
            SecretSource::LogCapture => 2,
            SecretSource::FallbackGuess => 1,
        }
    }
}

impl std::fmt::Display for SecretSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretSource::IssuancePayload => write!(f, "issuance_payload"),
            SecretSource::LogCapture => write!(f, "log_capture"),
            SecretSource::FallbackGuess => write!(f, "fallback_guess"),
        }
    }
}

/// A verification code together with its provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationCode {
    /// The six-digit code
    pub code: String,

    /// How the code was obtained
    pub source: SecretSource,
}

impl VerificationCode {
    pub fn new(code: impl Into<String>, source: SecretSource) -> Self {
        Self {
            code: code.into(),
            source,
        }
    }
}

/// Mutable state accumulated as probes execute
#[derive(Debug, Clone)]
pub struct RunState {
    identity: Identity,
    verification_code: Option<VerificationCode>,
    session_token: Option<String>,
}

impl RunState {
    /// Create run state with a freshly generated identity
    pub fn new() -> Self {
        Self {
            identity: Identity::generate(),
            verification_code: None,
            session_token: None,
        }
    }

    /// Create run state around a caller-supplied identity
    pub fn with_identity(identity: Identity) -> Self {
        Self {
            identity,
            verification_code: None,
            session_token: None,
        }
    }

    /// Identity for this run, fixed at construction
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// The recorded verification code, if any probe has captured one
    pub fn verification_code(&self) -> Option<&VerificationCode> {
        self.verification_code.as_ref()
    }

    /// Record a verification code.
    ///
    /// A code only displaces an existing one when its source is strictly
    /// stronger; equal or weaker candidates are ignored. Returns whether the
    /// candidate was recorded.
    pub fn record_code(&mut self, candidate: VerificationCode) -> bool {
        let accept = match &self.verification_code {
            None => true,
            Some(existing) => candidate.source.strength() > existing.source.strength(),
        };
        if accept {
            debug!(source = %candidate.source, "recording verification code");
            self.verification_code = Some(candidate);
        } else {
            debug!(source = %candidate.source, "ignoring weaker verification code");
        }
        accept
    }

    /// The session token, if login has produced one
    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    /// Record the session token. Write-once; later candidates are ignored.
    /// Returns whether the candidate was recorded.
    pub fn set_session_token(&mut self, token: impl Into<String>) -> bool {
        if self.session_token.is_some() {
            return false;
        }
        self.session_token = Some(token.into());
        true
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}
