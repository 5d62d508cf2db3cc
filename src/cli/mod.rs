//! Command-line driver.
//!
//! Parses arguments, bootstraps the session and dispatches to a handler:
//!
//! ```ignore
//! use portal::app::AppContext;
//! use portal::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args());
//! let app = AppContext::from_env()?;
//! run_cli_command(command, &app).await?;
//! ```

pub mod args;
pub mod commands;
pub mod version;

pub use args::{parse_args, CliCommand, USAGE};
pub use version::{handle_version_command, VERSION};

use color_eyre::eyre::bail;
use color_eyre::Result;
use tracing::debug;

use crate::app::AppContext;

/// Commands that need neither configuration nor network access.
pub fn run_local_command(command: &CliCommand) -> Option<Result<()>> {
    match command {
        CliCommand::Version => {
            handle_version_command();
            Some(Ok(()))
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            Some(Ok(()))
        }
        CliCommand::Invalid(message) => {
            eprintln!("{}", USAGE);
            Some(Err(color_eyre::eyre::eyre!(message.clone())))
        }
        _ => None,
    }
}

/// Run a command against the application context. The stored session is
/// restored first so every command sees the same auth state.
pub async fn run_cli_command(command: CliCommand, app: &AppContext) -> Result<()> {
    app.auth().bootstrap().await;
    debug!(authenticated = app.auth().is_authenticated(), "Session restored");

    match command {
        CliCommand::Login { email, password } => commands::login(app, &email, password).await,
        CliCommand::Logout => commands::logout(app).await,
        CliCommand::WhoAmI => commands::whoami(app).await,
        CliCommand::Explore { query } => commands::explore(app, &query).await,
        CliCommand::Material { id } => commands::material(app, &id).await,
        CliCommand::Rate { id, stars } => commands::rate(app, &id, stars).await,
        CliCommand::Version | CliCommand::Help | CliCommand::Invalid(_) => {
            match run_local_command(&command) {
                Some(result) => result,
                None => bail!("unexpected command"),
            }
        }
    }
}
