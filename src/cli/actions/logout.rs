use crate::api::auth::AuthFlow;
use crate::cli::actions::Console;
use anyhow::Result;
use std::sync::Arc;

pub(crate) async fn execute(console: &Console) -> Result<()> {
    let mut flow = AuthFlow::new(Arc::clone(&console.client));
    flow.logout().await?;
    println!("Signed out.");
    Ok(())
}
