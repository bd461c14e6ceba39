use crate::api::approvals::ApprovalFilters;
use crate::api::events::EventFilters;
use crate::api::types::ParticipantStatus;
use crate::api::users::UserFilters;
use crate::cli::actions::Action;
use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;

fn participant_status(raw: &str) -> Result<ParticipantStatus> {
    match raw.to_uppercase().as_str() {
        "PENDING" => Ok(ParticipantStatus::Pending),
        "CONFIRMED" => Ok(ParticipantStatus::Confirmed),
        "CANCELLED" => Ok(ParticipantStatus::Cancelled),
        other => Err(anyhow!(
            "invalid status {other}: expected PENDING, CONFIRMED or CANCELLED"
        )),
    }
}

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some(("login", sub)) => Ok(Action::Login {
            email: sub
                .get_one::<String>("email")
                .cloned()
                .context("missing required argument: --email")?,
            password: sub
                .get_one::<String>("password")
                .cloned()
                .map(SecretString::from)
                .context("missing required argument: --password")?,
            admin: sub.get_flag("admin"),
        }),
        Some(("logout", _)) => Ok(Action::Logout),
        Some(("whoami", _)) => Ok(Action::Whoami),
        Some(("users", sub)) => match sub.subcommand() {
            Some(("list", list)) => Ok(Action::UsersList(UserFilters {
                page: list.get_one::<u32>("page").copied(),
                limit: list.get_one::<u32>("limit").copied(),
                status: list.get_one::<String>("status").cloned(),
                search: list.get_one::<String>("search").cloned(),
            })),
            _ => Err(anyhow!("unknown users subcommand")),
        },
        Some(("events", sub)) => match sub.subcommand() {
            Some(("list", list)) => Ok(Action::EventsList(EventFilters {
                page: list.get_one::<u32>("page").copied(),
                limit: list.get_one::<u32>("limit").copied(),
                status: list.get_one::<String>("status").cloned(),
                search: list.get_one::<String>("search").cloned(),
                upcoming: list.get_flag("upcoming").then_some(true),
            })),
            Some(("cancel", cancel)) => Ok(Action::EventsCancel {
                id: cancel
                    .get_one::<i64>("id")
                    .copied()
                    .context("missing required argument: id")?,
            }),
            _ => Err(anyhow!("unknown events subcommand")),
        },
        Some(("approvals", sub)) => match sub.subcommand() {
            Some(("list", list)) => Ok(Action::ApprovalsList(ApprovalFilters {
                status: list
                    .get_one::<String>("status")
                    .map(|raw| participant_status(raw))
                    .transpose()?,
                event_id: list.get_one::<i64>("event-id").copied(),
            })),
            Some(("approve", approve)) => Ok(Action::ApprovalsApprove {
                event_id: approve
                    .get_one::<i64>("event-id")
                    .copied()
                    .context("missing required argument: event-id")?,
                participant_id: approve
                    .get_one::<i64>("participant-id")
                    .copied()
                    .context("missing required argument: participant-id")?,
            }),
            Some(("reject", reject)) => Ok(Action::ApprovalsReject {
                event_id: reject
                    .get_one::<i64>("event-id")
                    .copied()
                    .context("missing required argument: event-id")?,
                participant_id: reject
                    .get_one::<i64>("participant-id")
                    .copied()
                    .context("missing required argument: participant-id")?,
                reason: reject.get_one::<String>("reason").cloned(),
            }),
            _ => Err(anyhow!("unknown approvals subcommand")),
        },
        Some(("analytics", _)) => Ok(Action::Analytics),
        _ => Err(anyhow!("no command provided")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    #[test]
    fn dispatches_login() -> Result<()> {
        let matches = commands::new().get_matches_from(vec![
            "carmeet-admin",
            "login",
            "--email",
            "staff@carmeet.dev",
            "--password",
            "secret",
            "--admin",
        ]);
        match handler(&matches)? {
            Action::Login { email, admin, .. } => {
                assert_eq!(email, "staff@carmeet.dev");
                assert!(admin);
                Ok(())
            }
            other => Err(anyhow!("unexpected action: {other:?}")),
        }
    }

    #[test]
    fn dispatches_events_list_filters() -> Result<()> {
        let matches = commands::new().get_matches_from(vec![
            "carmeet-admin",
            "events",
            "list",
            "--page",
            "2",
            "--upcoming",
        ]);
        match handler(&matches)? {
            Action::EventsList(filters) => {
                assert_eq!(filters.page, Some(2));
                assert_eq!(filters.upcoming, Some(true));
                assert_eq!(filters.status, None);
                Ok(())
            }
            other => Err(anyhow!("unexpected action: {other:?}")),
        }
    }

    #[test]
    fn rejects_unknown_approval_status() {
        let matches = commands::new().get_matches_from(vec![
            "carmeet-admin",
            "approvals",
            "list",
            "--status",
            "MAYBE",
        ]);
        assert!(handler(&matches).is_err());
    }

    #[test]
    fn accepts_lowercase_approval_status() -> Result<()> {
        let matches = commands::new().get_matches_from(vec![
            "carmeet-admin",
            "approvals",
            "list",
            "--status",
            "pending",
        ]);
        match handler(&matches)? {
            Action::ApprovalsList(filters) => {
                assert_eq!(filters.status, Some(ParticipantStatus::Pending));
                Ok(())
            }
            other => Err(anyhow!("unexpected action: {other:?}")),
        }
    }
}
