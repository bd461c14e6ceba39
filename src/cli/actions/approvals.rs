use crate::api::approvals::{self, ApprovalFilters};
use crate::cli::actions::{ensure_signed_in, Console};
use anyhow::Result;

pub(crate) async fn list(console: &Console, filters: &ApprovalFilters) -> Result<()> {
    ensure_signed_in(console)?;

    let registrations = approvals::list(&console.client, filters).await?;
    if registrations.is_empty() {
        println!("No registrations match.");
        return Ok(());
    }

    for registration in &registrations {
        let driver = format!(
            "{} {}",
            registration.user.first_name, registration.user.last_name
        );
        println!(
            "event {:>5} participant {:>5}  {:<25}  {:<12}  {} {} ({driver})",
            registration.event_id,
            registration.id,
            registration.event.name,
            registration.status.as_str(),
            registration.car.brand,
            registration.car.model,
        );
    }
    Ok(())
}

pub(crate) async fn approve(console: &Console, event_id: i64, participant_id: i64) -> Result<()> {
    ensure_signed_in(console)?;

    approvals::approve(&console.client, event_id, participant_id).await?;
    println!("Approved participant {participant_id} for event {event_id}.");
    Ok(())
}

pub(crate) async fn reject(
    console: &Console,
    event_id: i64,
    participant_id: i64,
    reason: Option<&str>,
) -> Result<()> {
    ensure_signed_in(console)?;

    approvals::reject(&console.client, event_id, participant_id, reason).await?;
    println!("Rejected participant {participant_id} for event {event_id}.");
    Ok(())
}
