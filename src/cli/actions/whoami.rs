use crate::cli::actions::Console;
use anyhow::Result;

/// Purely local: reports the cached session without touching the network.
pub(crate) fn execute(console: &Console) -> Result<()> {
    if !console.session.is_authenticated() {
        println!("Not signed in.");
        return Ok(());
    }

    match console.session.current_user() {
        Some(user) => {
            println!("Signed in as {} <{}>.", user.display_name(), user.email);
            if let Some(role) = user.role {
                println!("Role: {}", role.name);
            }
        }
        None => println!("Signed in (no cached profile)."),
    }
    Ok(())
}
