//! Navigation guards over the session state. Both are pure, synchronous
//! decisions; real access control lives on the API.

use crate::session::SessionState;

pub const LOGIN_ROUTE: &str = "/auth/login";
pub const DASHBOARD_ROUTE: &str = "/dashboard";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(&'static str),
}

/// Gate for screens that need a signed-in user.
#[must_use]
pub fn require_auth(session: &SessionState) -> GuardDecision {
    if session.is_authenticated() {
        GuardDecision::Allow
    } else {
        GuardDecision::Redirect(LOGIN_ROUTE)
    }
}

/// Gate for the login screens: a signed-in user is sent to the dashboard.
#[must_use]
pub fn require_guest(session: &SessionState) -> GuardDecision {
    if session.is_authenticated() {
        GuardDecision::Redirect(DASHBOARD_ROUTE)
    } else {
        GuardDecision::Allow
    }
}
