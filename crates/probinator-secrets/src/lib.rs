//! Probinator Secrets
//!
//! Discovery of the short-lived verification code a service issues during
//! signup. Two strategies run in strict order: scan a bounded tail of the
//! service log for a code announcement, then fall back to validating a short
//! list of well-known guesses against the service itself. The log strategy
//! always wins when both would succeed.

use probinator_core::{SecretSource, VerificationCode};
use regex::Regex;
use tracing::debug;

pub mod logtail;

pub use logtail::read_tail;

/// Generic announcement label, as services print it without an identity
const GENERIC_CODE_PATTERN: &str = r"(?i)VERIFICATION CODE:\s*(\d{6})\b";

fn personal_code_pattern(email: &str) -> String {
    format!(
        r"(?i)verification code for {}:?\s*(\d{{6}})\b",
        regex::escape(email)
    )
}

/// Scan log lines, most recent first, for a six-digit code announcement.
///
/// Matches either the generic `VERIFICATION CODE:` label or the per-identity
/// `Verification code for <email>:` form for this run's email. Announcements
/// addressed to other identities are ignored.
pub fn scan_log_window(lines: &[String], email: &str) -> Option<String> {
    let generic = Regex::new(GENERIC_CODE_PATTERN);
    let personal = Regex::new(&personal_code_pattern(email));
    let (Ok(generic), Ok(personal)) = (generic, personal) else {
        return None;
    };

    for line in lines.iter().rev() {
        let captured = personal
            .captures(line)
            .or_else(|| generic.captures(line))
            .and_then(|c| c.get(1));
        if let Some(code) = captured {
            debug!("verification code captured from log window");
            return Some(code.as_str().to_string());
        }
    }
    None
}

/// Asks the service whether it accepts a guessed code
pub trait GuessValidator {
    /// Returns whether the service accepted `code`
    fn validate(&self, code: &str) -> bool;
}

impl<F: Fn(&str) -> bool> GuessValidator for F {
    fn validate(&self, code: &str) -> bool {
        self(code)
    }
}

/// Discover a verification code for `email`.
///
/// The log window is consulted first; a log-derived code short-circuits
/// without any guess being validated. Otherwise guesses are validated in
/// order and the first one the service accepts wins. Returns `None` when
/// neither strategy yields a code.
pub fn discover(
    lines: &[String],
    email: &str,
    guesses: &[String],
    validator: &dyn GuessValidator,
) -> Option<VerificationCode> {
    if let Some(code) = scan_log_window(lines, email) {
        return Some(VerificationCode::new(code, SecretSource::LogCapture));
    }

    for guess in guesses {
        debug!(code = %guess, "validating fallback guess");
        if validator.validate(guess) {
            return Some(VerificationCode::new(guess, SecretSource::FallbackGuess));
        }
    }
    None
}
