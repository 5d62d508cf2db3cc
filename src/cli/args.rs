//! Command-line argument parsing.

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Sign in; the password is prompted for when omitted
    Login {
        email: String,
        password: Option<String>,
    },
    Logout,
    /// Show the signed-in user
    WhoAmI,
    /// Search materials with an explore query string (`q=calculo&tab=trending`)
    Explore { query: String },
    /// Show one material with its comments
    Material { id: String },
    /// Rate a material from 1 to 5 stars
    Rate { id: String, stars: u8 },
    /// Arguments that do not form a command
    Invalid(String),
}

pub const USAGE: &str = "\
Usage: portal <command>

Commands:
  login <email> [password]   Sign in (prompts for the password when omitted)
  logout                     Sign out and clear the stored session
  whoami                     Show the signed-in user
  explore [query]            Search materials, e.g. explore \"q=calculo&tab=trending\"
  material <id>              Show a material and its comments
  rate <id> <stars>          Rate a material (1-5)
  --version, -V              Show version
  --help, -h                 Show this message";

/// Parse command-line arguments and return the appropriate command.
///
/// # Examples
///
/// ```
/// use portal::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["portal".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    // Skip the program name
    let args: Vec<String> = args.skip(1).collect();
    if args.iter().any(|a| a == "--version" || a == "-V") {
        return CliCommand::Version;
    }
    if args.iter().any(|a| a == "--help" || a == "-h") {
        return CliCommand::Help;
    }

    let mut rest = args.into_iter();
    let Some(command) = rest.next() else {
        return CliCommand::Help;
    };
    let rest: Vec<String> = rest.collect();

    match (command.as_str(), rest.as_slice()) {
        ("login", [email]) => CliCommand::Login {
            email: email.clone(),
            password: None,
        },
        ("login", [email, password]) => CliCommand::Login {
            email: email.clone(),
            password: Some(password.clone()),
        },
        ("logout", []) => CliCommand::Logout,
        ("whoami", []) => CliCommand::WhoAmI,
        ("explore", []) => CliCommand::Explore {
            query: String::new(),
        },
        ("explore", [query]) => CliCommand::Explore {
            query: query.trim_start_matches('?').to_string(),
        },
        ("material", [id]) => CliCommand::Material { id: id.clone() },
        ("rate", [id, stars]) => match stars.parse::<u8>() {
            Ok(stars) => CliCommand::Rate {
                id: id.clone(),
                stars,
            },
            Err(_) => CliCommand::Invalid(format!("'{}' is not a number of stars", stars)),
        },
        (other, _) => CliCommand::Invalid(format!("unrecognized command or arguments: {}", other)),
    }
}
