//! Interactive two-step sign-in. Step 1 runs with the provided credentials;
//! the command then waits on stdin for the emailed code, with `resend`
//! available until a code is accepted.

use crate::api::auth::{valid_code, AuthFlow, CODE_TTL};
use crate::api::error::ApiError;
use crate::cli::actions::Console;
use crate::session::guards::{require_guest, GuardDecision};
use anyhow::{bail, Result};
use secrecy::SecretString;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

pub(crate) async fn execute(
    console: &Console,
    email: &str,
    password: &SecretString,
    admin: bool,
) -> Result<()> {
    if let GuardDecision::Redirect(route) = require_guest(&console.session) {
        bail!(
            "Already signed in as {}. Run `carmeet-admin logout` first ({route}).",
            console.session.store().email()
        );
    }

    let mut flow = AuthFlow::new(Arc::clone(&console.client));
    if admin {
        flow.admin_login(email, password).await?;
    } else {
        flow.login(email, password).await?;
    }

    println!(
        "A 6-digit code was sent to {} and is valid for {} minutes.",
        flow.pending_email().unwrap_or(email),
        CODE_TTL.as_secs() / 60
    );

    let stdin = io::stdin();
    loop {
        print!("Code (or 'resend'): ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            bail!("Input closed before a code was entered");
        }
        let input = line.trim();

        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("resend") {
            flow.resend_code().await?;
            println!("A new code is on its way. The previous one no longer works.");
            continue;
        }
        if !valid_code(input) {
            println!("The code is 6 digits.");
            continue;
        }

        match flow.submit_code(input).await {
            Ok(user) => {
                println!("Signed in as {} <{}>.", user.display_name(), user.email);
                return Ok(());
            }
            Err(ApiError::InvalidOrExpiredCode) => {
                println!("Code invalid or expired. Try again or type 'resend'.");
            }
            Err(err) => return Err(err.into()),
        }
    }
}
