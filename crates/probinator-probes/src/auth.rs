//! Signup, verification, and login probes
//!
//! These three probes form the dependent auth flow: issuance generates the
//! account and may capture the code directly, verification consumes the code
//! (discovering it out-of-band when issuance did not provide one), and login
//! exercises the session endpoint with a placeholder credential.

use probinator_core::{
    Outcome, Probe, ProbeContext, ProbeResult, RunState, SecretSource, StateField,
    VerificationCode,
};
use probinator_secrets::{discover, read_tail};
use serde_json::json;
use tracing::debug;

/// Constant stand-in for an identity-provider token; the service is expected
/// to reject it
pub const PLACEHOLDER_TOKEN: &str = "mock_supabase_jwt_token_for_testing";

/// Soft probe: request a verification code for a fresh identity
pub struct IssuanceProbe;

impl Probe for IssuanceProbe {
    fn name(&self) -> &str {
        "verification-code-issuance"
    }

    fn description(&self) -> &str {
        "Requests a verification code for a freshly generated identity"
    }

    fn reads(&self) -> Vec<StateField> {
        vec![StateField::Identity]
    }

    fn writes(&self) -> Vec<StateField> {
        vec![StateField::VerificationSecret]
    }

    fn execute(&self, ctx: &dyn ProbeContext, state: &mut RunState) -> ProbeResult {
        let input = json!({
            "email": state.identity().email,
            "password": state.identity().password,
            "name": state.identity().display_name,
        });
        match ctx.surface().mutate("auth.sendVerificationCode", &input) {
            Outcome::Success { payload } => {
                if let Some(code) = payload.get("devCode").and_then(|v| v.as_str()) {
                    state.record_code(VerificationCode::new(code, SecretSource::IssuancePayload));
                    ProbeResult::pass(self.name(), "verification code sent (dev mode)")
                        .with_detail("code_in_payload", json!(true))
                } else {
                    ProbeResult::pass(self.name(), "verification code sent (production mode)")
                        .with_detail("code_in_payload", json!(false))
                }
            }
            Outcome::Failure { kind, message } => {
                ProbeResult::fail(self.name(), format!("issuance rejected: {message}"))
                    .with_detail("kind", json!(kind))
            }
        }
    }
}

/// Soft probe: verify the email with the discovered code
pub struct VerificationProbe;

impl VerificationProbe {
    /// Log window for this run, empty when no log is configured or readable
    fn log_window(ctx: &dyn ProbeContext) -> Vec<String> {
        let discovery = &ctx.config().discovery;
        let Some(path) = &discovery.log_path else {
            return Vec::new();
        };
        match read_tail(path, discovery.window_lines) {
            Ok(lines) => lines,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "log window unavailable");
                Vec::new()
            }
        }
    }
}

impl Probe for VerificationProbe {
    fn name(&self) -> &str {
        "email-verification"
    }

    fn description(&self) -> &str {
        "Verifies the generated identity's email with the discovered code"
    }

    fn reads(&self) -> Vec<StateField> {
        vec![StateField::Identity, StateField::VerificationSecret]
    }

    fn writes(&self) -> Vec<StateField> {
        vec![StateField::VerificationSecret]
    }

    fn execute(&self, ctx: &dyn ProbeContext, state: &mut RunState) -> ProbeResult {
        if state.verification_code().is_none() {
            let window = Self::log_window(ctx);
            let email = state.identity().email.clone();
            let surface = ctx.surface();
            let validator = |code: &str| {
                surface
                    .mutate("auth.verifyCode", &json!({"email": email, "code": code}))
                    .is_success()
            };
            let guesses = &ctx.config().discovery.fallback_codes;
            if let Some(found) = discover(&window, &email, guesses, &validator) {
                state.record_code(found);
            }
        }

        let Some(found) = state.verification_code().cloned() else {
            return ProbeResult::fail(self.name(), "no verification code available");
        };

        // A guess accepted during discovery was validated by the verification
        // endpoint itself; a second call would spend an already-consumed code.
        if found.source == SecretSource::FallbackGuess {
            return ProbeResult::pass(self.name(), "email verification successful")
                .with_detail("source", json!(found.source));
        }

        let input = json!({"email": state.identity().email, "code": found.code});
        match ctx.surface().mutate("auth.verifyCode", &input) {
            Outcome::Success { .. } => {
                ProbeResult::pass(self.name(), "email verification successful")
                    .with_detail("source", json!(found.source))
            }
            Outcome::Failure { kind, message } => {
                ProbeResult::fail(self.name(), format!("verification failed: {message}"))
                    .with_detail("kind", json!(kind))
                    .with_detail("source", json!(found.source))
            }
        }
    }
}

/// Soft probe: attempt a login with the placeholder credential.
///
/// Without a real identity provider the service is expected to reject this;
/// the rejection is recorded as an ordinary failure, never suppressed.
pub struct LoginProbe;

impl Probe for LoginProbe {
    fn name(&self) -> &str {
        "session-login"
    }

    fn description(&self) -> &str {
        "Attempts a session login with a placeholder identity-provider token"
    }

    fn writes(&self) -> Vec<StateField> {
        vec![StateField::SessionToken]
    }

    fn execute(&self, ctx: &dyn ProbeContext, state: &mut RunState) -> ProbeResult {
        let input = json!({"token": PLACEHOLDER_TOKEN});
        match ctx.surface().mutate("auth.supabaseLogin", &input) {
            Outcome::Success { payload } => {
                let token = payload
                    .get("token")
                    .and_then(|v| v.as_str())
                    .unwrap_or(PLACEHOLDER_TOKEN);
                state.set_session_token(token);
                ProbeResult::pass(self.name(), "login successful")
            }
            Outcome::Failure { kind, message } => ProbeResult::fail(
                self.name(),
                format!("login failed (expected without a real identity provider): {message}"),
            )
            .with_detail("kind", json!(kind)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{err, ok, ScriptedSurface, TestContext};
    use probinator_core::{ErrorKind, HarnessConfig};

    #[test]
    fn issuance_dev_mode_records_payload_code() {
        let surface = ScriptedSurface::new().script(
            "auth.sendVerificationCode",
            ok(json!({"success": true, "devCode": "775210"})),
        );
        let ctx = TestContext::new(surface);
        let mut state = RunState::new();

        let result = IssuanceProbe.execute(&ctx, &mut state);
        assert!(result.passed);
        assert_eq!(result.details["code_in_payload"], json!(true));

        let code = state.verification_code().unwrap();
        assert_eq!(code.code, "775210");
        assert_eq!(code.source, SecretSource::IssuancePayload);

        let calls = ctx.surface.calls_to("auth.sendVerificationCode");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].input["email"], json!(state.identity().email));
        assert_eq!(calls[0].input["password"], json!(state.identity().password));
        assert_eq!(calls[0].input["name"], json!(state.identity().display_name));
    }

    #[test]
    fn issuance_production_mode_records_nothing() {
        let surface = ScriptedSurface::new()
            .script("auth.sendVerificationCode", ok(json!({"success": true})));
        let ctx = TestContext::new(surface);
        let mut state = RunState::new();

        let result = IssuanceProbe.execute(&ctx, &mut state);
        assert!(result.passed);
        assert_eq!(result.details["code_in_payload"], json!(false));
        assert!(state.verification_code().is_none());
    }

    #[test]
    fn issuance_rejection_fails() {
        let surface = ScriptedSurface::new().script(
            "auth.sendVerificationCode",
            err(ErrorKind::Validation, "Invalid email address"),
        );
        let ctx = TestContext::new(surface);
        let mut state = RunState::new();

        let result = IssuanceProbe.execute(&ctx, &mut state);
        assert!(!result.passed);
        assert!(result.message.contains("Invalid email address"));
    }

    #[test]
    fn verification_sends_the_payload_code_exactly() {
        let surface =
            ScriptedSurface::new().script("auth.verifyCode", ok(json!({"success": true})));
        let ctx = TestContext::new(surface);
        let mut state = RunState::new();
        state.record_code(VerificationCode::new("775210", SecretSource::IssuancePayload));

        let result = VerificationProbe.execute(&ctx, &mut state);
        assert!(result.passed);

        let calls = ctx.surface.calls_to("auth.verifyCode");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].input["code"], json!("775210"));
        assert_eq!(calls[0].input["email"], json!(state.identity().email));
    }

    #[test]
    fn issuance_payload_code_flows_to_verification() {
        let surface = ScriptedSurface::new()
            .script(
                "auth.sendVerificationCode",
                ok(json!({"success": true, "devCode": "775210"})),
            )
            .script("auth.verifyCode", ok(json!({"success": true})));
        let ctx = TestContext::new(surface);
        let mut state = RunState::new();

        assert!(IssuanceProbe.execute(&ctx, &mut state).passed);
        assert!(VerificationProbe.execute(&ctx, &mut state).passed);

        let calls = ctx.surface.calls_to("auth.verifyCode");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].input["code"], json!("775210"));
    }

    #[test]
    fn verification_without_any_code_fails_after_exhausting_guesses() {
        let guesses = HarnessConfig::default().discovery.fallback_codes.len();
        let surface = ScriptedSurface::new().script_n(
            "auth.verifyCode",
            err(ErrorKind::Validation, "Invalid verification code"),
            guesses,
        );
        let ctx = TestContext::new(surface);
        let mut state = RunState::new();

        let result = VerificationProbe.execute(&ctx, &mut state);
        assert!(!result.passed);
        assert_eq!(result.message, "no verification code available");
        assert_eq!(ctx.surface.calls_to("auth.verifyCode").len(), guesses);
        assert!(state.verification_code().is_none());
    }

    #[test]
    fn verification_with_unreadable_log_degrades_to_guessing() {
        let mut config = HarnessConfig::default();
        config.discovery.log_path = Some("/nonexistent/backend.log".into());
        let guesses = config.discovery.fallback_codes.len();

        let surface = ScriptedSurface::new().script_n(
            "auth.verifyCode",
            err(ErrorKind::Validation, "Invalid verification code"),
            guesses,
        );
        let ctx = TestContext::with_config(surface, config);
        let mut state = RunState::new();

        // An unreadable log yields an empty window, so only the fallback
        // guesses reach the endpoint.
        let result = VerificationProbe.execute(&ctx, &mut state);
        assert!(!result.passed);
        assert_eq!(result.message, "no verification code available");
        assert_eq!(ctx.surface.calls_to("auth.verifyCode").len(), guesses);
        assert!(state.verification_code().is_none());
    }

    #[test]
    fn verification_accepted_guess_is_not_spent_twice() {
        // First guess accepted; the discovery call itself is the verification.
        let surface =
            ScriptedSurface::new().script("auth.verifyCode", ok(json!({"success": true})));
        let ctx = TestContext::new(surface);
        let mut state = RunState::new();

        let result = VerificationProbe.execute(&ctx, &mut state);
        assert!(result.passed);
        assert_eq!(ctx.surface.calls_to("auth.verifyCode").len(), 1);

        let code = state.verification_code().unwrap();
        assert_eq!(code.code, "123456");
        assert_eq!(code.source, SecretSource::FallbackGuess);
    }

    #[test]
    fn verification_prefers_log_capture_over_guessing() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("backend.log");
        std::fs::write(&log, "server listening\nVERIFICATION CODE: 482913\n").unwrap();

        let surface =
            ScriptedSurface::new().script("auth.verifyCode", ok(json!({"success": true})));
        let mut config = HarnessConfig::default();
        config.discovery.log_path = Some(log);
        let ctx = TestContext::with_config(surface, config);
        let mut state = RunState::new();

        let result = VerificationProbe.execute(&ctx, &mut state);
        assert!(result.passed);

        // One real verification call with the captured code; no guess calls.
        let calls = ctx.surface.calls_to("auth.verifyCode");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].input["code"], json!("482913"));
        assert_eq!(
            state.verification_code().unwrap().source,
            SecretSource::LogCapture
        );
    }

    #[test]
    fn login_rejection_is_recorded_as_failure() {
        let surface = ScriptedSurface::new()
            .script("auth.supabaseLogin", err(ErrorKind::AuthRequired, "Invalid token"));
        let ctx = TestContext::new(surface);
        let mut state = RunState::new();

        let result = LoginProbe.execute(&ctx, &mut state);
        assert!(!result.passed);
        assert!(result.message.contains("Invalid token"));
        assert!(state.session_token().is_none());

        let calls = ctx.surface.calls_to("auth.supabaseLogin");
        assert_eq!(calls[0].input["token"], json!(PLACEHOLDER_TOKEN));
    }

    #[test]
    fn login_success_records_payload_token() {
        let surface = ScriptedSurface::new().script(
            "auth.supabaseLogin",
            ok(json!({"success": true, "token": "session-abc"})),
        );
        let ctx = TestContext::new(surface);
        let mut state = RunState::new();

        assert!(LoginProbe.execute(&ctx, &mut state).passed);
        assert_eq!(state.session_token(), Some("session-abc"));
    }

    #[test]
    fn login_success_without_payload_token_keeps_placeholder() {
        let surface = ScriptedSurface::new()
            .script("auth.supabaseLogin", ok(json!({"success": true})));
        let ctx = TestContext::new(surface);
        let mut state = RunState::new();

        assert!(LoginProbe.execute(&ctx, &mut state).passed);
        assert_eq!(state.session_token(), Some(PLACEHOLDER_TOKEN));
    }

    #[test]
    fn probe_declarations_cover_their_state_access() {
        assert_eq!(IssuanceProbe.writes(), vec![StateField::VerificationSecret]);
        assert!(VerificationProbe
            .reads()
            .contains(&StateField::VerificationSecret));
        assert_eq!(LoginProbe.writes(), vec![StateField::SessionToken]);
    }
}
