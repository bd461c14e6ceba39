use crate::cli::{actions::Action, commands, dispatch::handler, globals::GlobalArgs};
use anyhow::{anyhow, Result};
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

fn default_session_file() -> PathBuf {
    std::env::var_os("HOME").map_or_else(
        || PathBuf::from(".carmeet-admin-session.json"),
        |home| {
            PathBuf::from(home)
                .join(".config")
                .join("carmeet-admin")
                .join("session.json")
        },
    )
}

/// Start the CLI
/// # Errors
/// Returns an error if arguments are invalid or the subscriber cannot be set.
pub fn start() -> Result<(Action, GlobalArgs)> {
    let matches = commands::new().get_matches();

    let verbosity_level = match matches.get_one::<u8>("verbosity").map_or(0, |&v| v) {
        0 => tracing::Level::ERROR,
        1 => tracing::Level::WARN,
        2 => tracing::Level::INFO,
        3 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let fmt_layer = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(false);

    // RUST_LOG=
    let env_filter = EnvFilter::builder()
        .with_default_directive(verbosity_level.into())
        .from_env_lossy();

    let subscriber = Registry::default().with(fmt_layer).with(env_filter);

    tracing::subscriber::set_global_default(subscriber)?;

    let action = handler(&matches)?;

    let api_url = matches
        .get_one::<String>("api-url")
        .cloned()
        .ok_or_else(|| anyhow!("missing required argument: --api-url"))?;
    let session_file = matches
        .get_one::<String>("session-file")
        .map_or_else(default_session_file, PathBuf::from);

    Ok((action, GlobalArgs::new(api_url, session_file)))
}
