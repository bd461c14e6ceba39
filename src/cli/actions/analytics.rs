use crate::api::analytics;
use crate::cli::actions::{ensure_signed_in, Console};
use anyhow::Result;
use serde_json::Value;

fn print_feed(title: &str, rows: &[Value]) {
    println!("## {title} ({} rows)", rows.len());
    for row in rows {
        println!("{row}");
    }
    println!();
}

pub(crate) async fn execute(console: &Console) -> Result<()> {
    ensure_signed_in(console)?;

    let summary = analytics::summary(&console.client).await?;
    print_feed("Attendance", &summary.attendance);
    print_feed("Cars", &summary.cars_stats);
    print_feed("Roles", &summary.roles_distribution);
    print_feed("Top cars", &summary.top_cars);
    print_feed("Photos", &summary.photos_summary);
    Ok(())
}
