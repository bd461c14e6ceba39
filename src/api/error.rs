//! Error taxonomy for the API pipeline. Auth-specific variants carry the
//! recovery story (resubmit credentials, retry or resend the code, sign in
//! again); transport variants carry a user-facing message.

use std::fmt;

#[derive(Clone, Debug)]
pub enum ApiError {
    Config(String),
    Network(String),
    Timeout(String),
    /// Step 1 rejected the email/password pair.
    InvalidCredentials,
    /// Step 2 rejected the one-time code.
    InvalidOrExpiredCode,
    /// Step 2 succeeded at the HTTP level but no accepted response shape
    /// yielded both a token and a user. No session is committed.
    MalformedResponse(String),
    /// A request came back 401/403; the local session has been cleared.
    SessionExpired { status: u16 },
    Http { status: u16, message: String },
    Parse(String),
    Serialization(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Config(message) => write!(formatter, "Config error: {message}"),
            ApiError::Network(message) => write!(formatter, "Network error: {message}"),
            ApiError::Timeout(message) => write!(formatter, "Timeout: {message}"),
            ApiError::InvalidCredentials => {
                write!(formatter, "Invalid credentials.")
            }
            ApiError::InvalidOrExpiredCode => {
                write!(formatter, "Code invalid or expired.")
            }
            ApiError::MalformedResponse(message) => {
                write!(formatter, "Malformed server response: {message}")
            }
            ApiError::SessionExpired { status } => {
                write!(formatter, "Session expired ({status}). Please sign in again.")
            }
            ApiError::Http { status, message } => {
                write!(formatter, "Request failed ({status}): {message}")
            }
            ApiError::Parse(message) => write!(formatter, "Response error: {message}"),
            ApiError::Serialization(message) => {
                write!(formatter, "Request error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}
