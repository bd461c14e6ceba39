//! HTTP pipeline for the CarMeet API. Every request goes through one place
//! that attaches the bearer token, skips it for the public auth endpoints,
//! and reacts to 401/403 by invalidating the session, so feature clients
//! never handle session plumbing themselves.

pub mod analytics;
pub mod approvals;
pub mod auth;
pub mod error;
pub mod events;
pub mod types;
pub mod users;

use crate::session::SessionState;
use error::ApiError;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

/// Request timeout applied to every call so the console never hangs on a
/// stalled connection.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Maximum number of error body characters surfaced to the user.
const MAX_ERROR_CHARS: usize = 200;

/// Auth endpoints that must be reachable without a session. Requests whose
/// path matches are sent without an Authorization header even when a token
/// is present.
const PUBLIC_PATHS: &[&str] = &[
    "/auth/login",
    "/auth/admin-login",
    "/auth/verify-code",
    "/auth/resend-code",
    "/auth/register",
    "/auth/activate",
];

pub struct ApiClient {
    base_url: String,
    http: Client,
    session: Arc<SessionState>,
}

impl ApiClient {
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be built.
    pub fn new(base_url: &str, session: Arc<SessionState>) -> Result<Self, ApiError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        Url::parse(trimmed)
            .map_err(|err| ApiError::Config(format!("Invalid API base URL {trimmed}: {err}")))?;

        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(map_request_error)?;

        Ok(Self {
            base_url: trimmed.to_string(),
            http,
            session,
        })
    }

    #[must_use]
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim().trim_start_matches('/'))
    }

    fn is_public_path(path: &str) -> bool {
        PUBLIC_PATHS.iter().any(|public| path.contains(public))
    }

    /// Build a request with the authorization rule applied: public paths go
    /// out untouched; everything else carries the stored token when present.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.build_url(path));
        if Self::is_public_path(path) {
            return builder;
        }
        match self.session.store().token() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Send a request and apply the authorization-failure rule: a 401/403
    /// clears the session, records the login redirect and re-raises, so the
    /// caller still sees the failure.
    async fn execute(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await.map_err(map_request_error)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            debug!("Authorization failure ({status}), invalidating session");
            self.session
                .invalidate("Session expired. Please sign in again.");
            return Err(ApiError::SessionExpired {
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(self.request(Method::GET, path)).await?;
        handle_json_response(response).await
    }

    pub(crate) async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self
            .execute(self.request(Method::GET, path).query(query))
            .await?;
        handle_json_response(response).await
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .execute(self.request(Method::POST, path).json(body))
            .await?;
        handle_json_response(response).await
    }

    pub(crate) async fn post_json_empty<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let response = self
            .execute(self.request(Method::POST, path).json(body))
            .await?;
        handle_empty_response(response).await
    }

    pub(crate) async fn put_json_empty<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let response = self
            .execute(self.request(Method::PUT, path).json(body))
            .await?;
        handle_empty_response(response).await
    }

    pub(crate) async fn patch_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .execute(self.request(Method::PATCH, path).json(body))
            .await?;
        handle_json_response(response).await
    }

    pub(crate) async fn patch_json_empty<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let response = self
            .execute(self.request(Method::PATCH, path).json(body))
            .await?;
        handle_empty_response(response).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self.execute(self.request(Method::DELETE, path)).await?;
        handle_empty_response(response).await
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ApiError> {
        let response = self
            .execute(self.request(Method::POST, path).multipart(form))
            .await?;
        handle_json_response(response).await
    }

    pub(crate) async fn put_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ApiError> {
        let response = self
            .execute(self.request(Method::PUT, path).multipart(form))
            .await?;
        handle_json_response(response).await
    }
}

/// Maps transport errors into user-facing variants with timeout detection.
fn map_request_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout("Request timed out. Please try again.".to_string())
    } else if err.is_builder() {
        ApiError::Config(format!("Failed to build request: {err}"))
    } else {
        ApiError::Network(format!("Unable to reach the server: {err}"))
    }
}

/// Parses JSON responses and surfaces HTTP errors with sanitized bodies.
async fn handle_json_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if response.status().is_success() {
        response
            .json::<T>()
            .await
            .map_err(|err| ApiError::Parse(format!("Failed to decode response: {err}")))
    } else {
        Err(http_error(response).await)
    }
}

/// Handles responses whose body carries nothing the console needs.
async fn handle_empty_response(response: Response) -> Result<(), ApiError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(http_error(response).await)
    }
}

async fn http_error(response: Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ApiError::Http {
        status,
        message: sanitize_body(body),
    }
}

/// Trims and truncates HTTP error bodies before they reach the user.
fn sanitize_body(body: String) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}
