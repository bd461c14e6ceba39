use crate::api::events::{self, EventFilters};
use crate::cli::actions::{ensure_signed_in, Console};
use anyhow::Result;

pub(crate) async fn list(console: &Console, filters: &EventFilters) -> Result<()> {
    ensure_signed_in(console)?;

    let page = events::list(&console.client, filters).await?;
    for event in &page.events {
        let participants = event
            .counts
            .as_ref()
            .map_or("-".to_string(), |counts| counts.participants.to_string());
        let capacity = event
            .max_participants
            .map_or("-".to_string(), |max| max.to_string());
        println!(
            "{:>6}  {:<30}  {:<20}  {:<25}  {:?}  {participants}/{capacity}",
            event.id, event.name, event.date, event.location, event.status,
        );
    }
    println!(
        "Page {}/{} ({} events)",
        page.pagination.page, page.pagination.pages, page.pagination.total
    );
    Ok(())
}

pub(crate) async fn cancel(console: &Console, id: i64) -> Result<()> {
    ensure_signed_in(console)?;

    let event = events::cancel(&console.client, id).await?;
    println!("Cancelled event {} ({}).", event.id, event.name);
    Ok(())
}
