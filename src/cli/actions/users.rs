use crate::api::users::{self, UserFilters};
use crate::cli::actions::{ensure_signed_in, Console};
use anyhow::Result;

pub(crate) async fn execute(console: &Console, filters: &UserFilters) -> Result<()> {
    ensure_signed_in(console)?;

    let page = users::list(&console.client, filters).await?;
    for user in &page.users {
        let role = user.role_slug().unwrap_or("-");
        let active = match user.is_active {
            Some(true) => "active",
            Some(false) => "inactive",
            None => "-",
        };
        println!(
            "{:>6}  {:<30}  {:<30}  {:<10}  {active}",
            user.id,
            user.display_name(),
            user.email,
            role,
        );
    }
    println!(
        "Page {}/{} ({} users)",
        page.pagination.page, page.pagination.pages, page.pagination.total
    );
    Ok(())
}
