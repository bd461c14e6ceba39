use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ArgAction, ColorChoice, Command,
};

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

fn page_args() -> [Arg; 2] {
    [
        Arg::new("page")
            .long("page")
            .help("Page to fetch")
            .value_parser(clap::value_parser!(u32)),
        Arg::new("limit")
            .long("limit")
            .help("Items per page")
            .value_parser(clap::value_parser!(u32)),
    ]
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    Command::new("carmeet-admin")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .help("Base URL of the CarMeet API, example: https://api.carmeet.dev/api")
                .env("CARMEET_ADMIN_API_URL")
                .default_value("http://localhost:3000/api")
                .global(true),
        )
        .arg(
            Arg::new("session-file")
                .long("session-file")
                .help("Session record file (default: $HOME/.config/carmeet-admin/session.json)")
                .env("CARMEET_ADMIN_SESSION_FILE")
                .global(true),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("CARMEET_ADMIN_LOG_LEVEL")
                .global(true)
                .action(ArgAction::Count)
                .value_parser(validator_log_level()),
        )
        .subcommand(
            Command::new("login")
                .about("Sign in with email, password and an emailed one-time code")
                .arg(
                    Arg::new("email")
                        .short('e')
                        .long("email")
                        .help("Staff email address")
                        .env("CARMEET_ADMIN_EMAIL")
                        .required(true),
                )
                .arg(
                    Arg::new("password")
                        .long("password")
                        .help("Account password")
                        .env("CARMEET_ADMIN_PASSWORD")
                        .hide_env_values(true)
                        .required(true),
                )
                .arg(
                    Arg::new("admin")
                        .long("admin")
                        .help("Use the administrator login endpoint")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("logout").about("Sign out and clear the stored session"))
        .subcommand(Command::new("whoami").about("Show the locally cached session"))
        .subcommand(
            Command::new("users")
                .about("Manage platform users")
                .subcommand_required(true)
                .subcommand(
                    Command::new("list")
                        .about("List users")
                        .args(page_args())
                        .arg(Arg::new("status").long("status").help("Filter by status"))
                        .arg(Arg::new("search").long("search").help("Search term")),
                ),
        )
        .subcommand(
            Command::new("events")
                .about("Manage events")
                .subcommand_required(true)
                .subcommand(
                    Command::new("list")
                        .about("List events")
                        .args(page_args())
                        .arg(Arg::new("status").long("status").help("Filter by status"))
                        .arg(Arg::new("search").long("search").help("Search term"))
                        .arg(
                            Arg::new("upcoming")
                                .long("upcoming")
                                .help("Only events that have not happened yet")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(
                    Command::new("cancel")
                        .about("Cancel an event, keeping its registrations on record")
                        .arg(
                            Arg::new("id")
                                .help("Event id")
                                .required(true)
                                .value_parser(clap::value_parser!(i64)),
                        ),
                ),
        )
        .subcommand(
            Command::new("approvals")
                .about("Review participant registrations")
                .subcommand_required(true)
                .subcommand(
                    Command::new("list")
                        .about("List registrations awaiting a decision")
                        .arg(
                            Arg::new("status")
                                .long("status")
                                .help("Filter by status: PENDING, CONFIRMED or CANCELLED"),
                        )
                        .arg(
                            Arg::new("event-id")
                                .long("event-id")
                                .help("Filter by event")
                                .value_parser(clap::value_parser!(i64)),
                        ),
                )
                .subcommand(
                    Command::new("approve")
                        .about("Approve a registration")
                        .arg(
                            Arg::new("event-id")
                                .help("Event id")
                                .required(true)
                                .value_parser(clap::value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("participant-id")
                                .help("Participant id")
                                .required(true)
                                .value_parser(clap::value_parser!(i64)),
                        ),
                )
                .subcommand(
                    Command::new("reject")
                        .about("Reject a registration")
                        .arg(
                            Arg::new("event-id")
                                .help("Event id")
                                .required(true)
                                .value_parser(clap::value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("participant-id")
                                .help("Participant id")
                                .required(true)
                                .value_parser(clap::value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("reason")
                                .long("reason")
                                .help("Reason shown to the participant"),
                        ),
                ),
        )
        .subcommand(Command::new("analytics").about("Show aggregate platform statistics"))
}
