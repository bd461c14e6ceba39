//! Two-step login flow. Step 1 verifies the password and makes the server
//! email a one-time code; step 2 trades the code for the session token. The
//! state machine here is authoritative: the UI only drives transitions and
//! renders the current phase, and the session is committed exactly once, on a
//! successful verification.

use crate::api::error::ApiError;
use crate::api::types::User;
use crate::api::ApiClient;
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Server-side lifetime of an issued one-time code. Informational only; the
/// server is the one that expires codes.
pub const CODE_TTL: Duration = Duration::from_secs(300);

/// Ephemeral context held between step 1 and step 2. Never persisted: a
/// restart sends the user back to step 1.
#[derive(Clone, Debug)]
pub struct PendingLogin {
    pub email: String,
    pub expires_in: Duration,
}

#[derive(Clone, Debug, Default)]
pub enum AuthPhase {
    #[default]
    Unauthenticated,
    /// Step 1 in flight.
    CredentialsPending,
    /// Step 1 accepted; a code is on its way to the user's inbox.
    CodeIssued(PendingLogin),
    /// Step 2 in flight.
    CodeVerifying(PendingLogin),
    Authenticated,
}

/// Accepted shapes of a 2xx verification response. Deployments have returned
/// the payload both at the top level and under a `data` envelope; rejections
/// sometimes arrive as 2xx `{success: false}` bodies.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum VerifyEnvelope {
    Direct(SessionPayload),
    Nested { data: SessionPayload },
    Outcome {
        success: bool,
        #[serde(default)]
        message: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
struct SessionPayload {
    token: String,
    user: User,
}

/// Maps any accepted shape to a canonical token+user pair, or the
/// appropriate rejection.
fn normalize_verification(envelope: VerifyEnvelope) -> Result<(SecretString, User), ApiError> {
    match envelope {
        VerifyEnvelope::Direct(payload) | VerifyEnvelope::Nested { data: payload } => {
            if payload.token.is_empty() {
                return Err(ApiError::MalformedResponse(
                    "verification response carried an empty token".to_string(),
                ));
            }
            Ok((SecretString::from(payload.token), payload.user))
        }
        VerifyEnvelope::Outcome { success: false, message } => {
            debug!("Verification rejected: {}", message.unwrap_or_default());
            Err(ApiError::InvalidOrExpiredCode)
        }
        VerifyEnvelope::Outcome { success: true, .. } => Err(ApiError::MalformedResponse(
            "verification response carried no token or user".to_string(),
        )),
    }
}

pub struct AuthFlow {
    client: Arc<ApiClient>,
    phase: AuthPhase,
}

impl AuthFlow {
    #[must_use]
    pub fn new(client: Arc<ApiClient>) -> Self {
        let phase = if client.session().is_authenticated() {
            AuthPhase::Authenticated
        } else {
            AuthPhase::Unauthenticated
        };
        Self { client, phase }
    }

    #[must_use]
    pub fn phase(&self) -> &AuthPhase {
        &self.phase
    }

    #[must_use]
    pub fn pending_email(&self) -> Option<&str> {
        match &self.phase {
            AuthPhase::CodeIssued(pending) | AuthPhase::CodeVerifying(pending) => {
                Some(pending.email.as_str())
            }
            _ => None,
        }
    }

    /// Step 1 for staff accounts.
    ///
    /// # Errors
    /// `InvalidCredentials` when the server rejects the pair; transport
    /// errors pass through. Session state is untouched either way.
    pub async fn login(&mut self, email: &str, password: &SecretString) -> Result<(), ApiError> {
        self.start_credentials("/auth/login", email, password).await
    }

    /// Step 1 against the dedicated administrator endpoint.
    ///
    /// # Errors
    /// Same contract as [`AuthFlow::login`].
    pub async fn admin_login(
        &mut self,
        email: &str,
        password: &SecretString,
    ) -> Result<(), ApiError> {
        self.start_credentials("/auth/admin-login", email, password)
            .await
    }

    async fn start_credentials(
        &mut self,
        path: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<(), ApiError> {
        let email = normalize_email(email);
        if !valid_email(&email) {
            return Err(ApiError::Config(format!("Invalid email address: {email}")));
        }

        self.phase = AuthPhase::CredentialsPending;
        let payload = json!({
            "email": email,
            "password": password.expose_secret(),
        });

        match self.client.post_json_empty(path, &payload).await {
            Ok(()) => {
                info!("One-time code sent to {email}");
                self.phase = AuthPhase::CodeIssued(PendingLogin {
                    email,
                    expires_in: CODE_TTL,
                });
                Ok(())
            }
            Err(err) => {
                self.phase = AuthPhase::Unauthenticated;
                Err(map_credentials_error(err))
            }
        }
    }

    /// Step 2: trade the emailed code for the session token. On success the
    /// store and state service are updated together and the returned user is
    /// the freshly cached one.
    ///
    /// # Errors
    /// `InvalidOrExpiredCode` when the server rejects the code (the attempt
    /// stays open for a retry or resend), `MalformedResponse` when a 2xx body
    /// yields no token+user pair; nothing is committed on any error.
    pub async fn submit_code(&mut self, code: &str) -> Result<User, ApiError> {
        let pending = match &self.phase {
            AuthPhase::CodeIssued(pending) => pending.clone(),
            _ => {
                return Err(ApiError::Config(
                    "No login attempt is awaiting a code".to_string(),
                ))
            }
        };

        self.phase = AuthPhase::CodeVerifying(pending.clone());
        let payload = json!({
            "email": pending.email,
            "code": code,
        });

        let envelope: VerifyEnvelope = match self
            .client
            .post_json("/auth/verify-code", &payload)
            .await
        {
            Ok(envelope) => envelope,
            Err(err) => {
                self.phase = AuthPhase::CodeIssued(pending);
                return Err(map_verification_error(err));
            }
        };

        match normalize_verification(envelope) {
            Ok((token, user)) => {
                if let Err(err) = self.client.session().establish(&token, &user) {
                    self.phase = AuthPhase::CodeIssued(pending);
                    return Err(ApiError::Config(format!("Failed to persist session: {err}")));
                }
                self.phase = AuthPhase::Authenticated;
                info!("Signed in as {}", user.email);
                Ok(user)
            }
            Err(err) => {
                self.phase = AuthPhase::CodeIssued(pending);
                Err(err)
            }
        }
    }

    /// Ask the server for a fresh code. The previous code is invalidated
    /// server-side; the attempt stays in the code-entry phase.
    ///
    /// # Errors
    /// Returns an error if no attempt is awaiting a code or the call fails;
    /// no stored session record is touched either way.
    pub async fn resend_code(&mut self) -> Result<(), ApiError> {
        let pending = match &self.phase {
            AuthPhase::CodeIssued(pending) => pending.clone(),
            _ => {
                return Err(ApiError::Config(
                    "No login attempt is awaiting a code".to_string(),
                ))
            }
        };

        let payload = json!({ "email": pending.email });
        self.client.post_json_empty("/auth/resend-code", &payload).await
    }

    /// Sign out. The server call is best-effort; the local session is
    /// cleared no matter how it settles.
    ///
    /// # Errors
    /// Returns an error only if the local clear fails.
    pub async fn logout(&mut self) -> Result<(), ApiError> {
        if let Err(err) = self.client.post_json_empty("/auth/logout", &json!({})).await {
            debug!("Logout call failed, clearing the local session anyway: {err}");
        }
        self.phase = AuthPhase::Unauthenticated;
        self.client
            .session()
            .clear()
            .map_err(|err| ApiError::Config(format!("Failed to clear session: {err}")))
    }
}

/// Step 1 rejections become `InvalidCredentials`; transport errors pass
/// through untouched.
fn map_credentials_error(err: ApiError) -> ApiError {
    match err {
        ApiError::Http { .. } | ApiError::SessionExpired { .. } => ApiError::InvalidCredentials,
        other => other,
    }
}

/// Step 2 rejections become `InvalidOrExpiredCode`; a 2xx body that matched
/// no accepted shape is a malformed response.
fn map_verification_error(err: ApiError) -> ApiError {
    match err {
        ApiError::Http { .. } | ApiError::SessionExpired { .. } => ApiError::InvalidOrExpiredCode,
        ApiError::Parse(message) => ApiError::MalformedResponse(message),
        other => other,
    }
}

/// Normalize an email before it goes over the wire.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic email format check on already-normalized input.
#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email))
}

/// Shape check for the six-digit one-time code.
#[must_use]
pub fn valid_code(code: &str) -> bool {
    code.len() == 6 && code.bytes().all(|byte| byte.is_ascii_digit())
}
