use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};
use urge::cli::commands::Cli;
use urge::cli::handlers;

const LOG_ENV: &str = "URGE_LOG";

/// Log to stderr, filtered by `URGE_LOG` (default `warn`).
///
/// The form draws over the terminal, so it only gets a subscriber when
/// logging was asked for explicitly.
fn init_tracing(interactive: bool) {
    let requested = std::env::var_os(LOG_ENV).is_some();
    if interactive && !requested {
        return;
    }
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.command.is_none());

    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
