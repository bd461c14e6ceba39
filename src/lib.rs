//! # CarMeet Admin
//!
//! `carmeet-admin` is the administration console for the CarMeet event
//! platform. Staff sign in with email, password and an emailed one-time code;
//! the resulting session token authorizes every further call to the platform
//! REST API (users, events, participant approvals, analytics).
//!
//! The crate is split along the session/authorization pipeline:
//!
//! - [`session`]: durable session records (token + cached user), the
//!   in-memory session state service and the route guards.
//! - [`api`]: the HTTP client that attaches the bearer token, enforces the
//!   public-endpoint allow-list and invalidates the session on 401/403,
//!   plus the typed clients for each API area and the two-step login flow.
//! - [`cli`]: the terminal front end driving the flow and rendering results.
//!
//! All "hard" decisions (capacity, roles, code issuance, approval rules)
//! live on the server; this crate never interprets the token it stores.

pub mod api;
pub mod cli;
pub mod session;

pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
