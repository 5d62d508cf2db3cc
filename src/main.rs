use color_eyre::Result;
use tracing_subscriber::EnvFilter;

use portal::app::AppContext;
use portal::cli::{parse_args, run_cli_command, run_local_command};

const DEFAULT_LOG_FILTER: &str = "portal=info";

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let command = parse_args(std::env::args());

    // Handle --version and --help before any initialization
    if let Some(result) = run_local_command(&command) {
        return result;
    }

    color_eyre::install()?;
    init_tracing();

    let app = AppContext::from_env()?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_cli_command(command, &app))
}
