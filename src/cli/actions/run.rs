use crate::cli::actions::{
    analytics, approvals, console, events, login, logout, users, whoami, Action,
};
use crate::cli::globals::GlobalArgs;
use anyhow::Result;

/// Execute the provided action.
// This is the single dispatch point for all CLI actions.
// To add a new action, add a new `Action::*` variant and a corresponding `*::execute` call here.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action, globals: &GlobalArgs) -> Result<()> {
    let console = console(globals)?;

    let result = match action {
        Action::Login {
            email,
            password,
            admin,
        } => login::execute(&console, &email, &password, admin).await,
        Action::Logout => logout::execute(&console).await,
        Action::Whoami => whoami::execute(&console),
        Action::UsersList(filters) => users::execute(&console, &filters).await,
        Action::EventsList(filters) => events::list(&console, &filters).await,
        Action::EventsCancel { id } => events::cancel(&console, id).await,
        Action::ApprovalsList(filters) => approvals::list(&console, &filters).await,
        Action::ApprovalsApprove {
            event_id,
            participant_id,
        } => approvals::approve(&console, event_id, participant_id).await,
        Action::ApprovalsReject {
            event_id,
            participant_id,
            reason,
        } => approvals::reject(&console, event_id, participant_id, reason.as_deref()).await,
        Action::Analytics => analytics::execute(&console).await,
    };

    // The authorization pipeline may have dropped the session mid-command;
    // surface the forced navigation exactly once.
    if let Some(route) = console.session.take_redirect() {
        eprintln!("Session expired. Sign in again with `carmeet-admin login` ({route}).");
    }

    result
}
