pub mod analytics;
pub mod approvals;
pub mod events;
pub mod login;
pub mod logout;
pub mod users;
pub mod whoami;

// Internal "interpreter" for `Action`.
// We keep the match in a separate module so `mod.rs` stays small as more actions are added.
mod run;

use crate::api::approvals::ApprovalFilters;
use crate::api::events::EventFilters;
use crate::api::users::UserFilters;
use crate::api::ApiClient;
use crate::cli::globals::GlobalArgs;
use crate::session::guards::{require_auth, GuardDecision};
use crate::session::{FileBackend, SessionState, SessionStore, StorageBackend};
use anyhow::{bail, Result};
use secrecy::SecretString;
use std::sync::Arc;

#[derive(Debug)]
pub enum Action {
    Login {
        email: String,
        password: SecretString,
        admin: bool,
    },
    Logout,
    Whoami,
    UsersList(UserFilters),
    EventsList(EventFilters),
    EventsCancel {
        id: i64,
    },
    ApprovalsList(ApprovalFilters),
    ApprovalsApprove {
        event_id: i64,
        participant_id: i64,
    },
    ApprovalsReject {
        event_id: i64,
        participant_id: i64,
        reason: Option<String>,
    },
    Analytics,
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self, globals: &GlobalArgs) -> Result<()> {
        run::execute(self, globals).await
    }
}

/// The wired-up console: one session state instance per process, shared by
/// the API client and every command.
pub(crate) struct Console {
    pub session: Arc<SessionState>,
    pub client: Arc<ApiClient>,
}

pub(crate) fn console(globals: &GlobalArgs) -> Result<Console> {
    let backend: Arc<dyn StorageBackend> = Arc::new(FileBackend::open(&globals.session_file));
    let session = Arc::new(SessionState::new(SessionStore::new(backend)));
    let client = Arc::new(ApiClient::new(&globals.api_url, Arc::clone(&session))?);
    Ok(Console { session, client })
}

/// Commands behind the signed-in gate evaluate the guard before touching the
/// network, mirroring how the protected screens are unreachable signed out.
pub(crate) fn ensure_signed_in(console: &Console) -> Result<()> {
    match require_auth(&console.session) {
        GuardDecision::Allow => Ok(()),
        GuardDecision::Redirect(route) => {
            bail!("Not signed in. Run `carmeet-admin login` first ({route}).")
        }
    }
}
