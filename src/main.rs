//! envseal - launch a program with decrypted secrets as its environment.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use envseal::cli::output;
use envseal::cli::{execute, Cli};
use envseal::core::constants;

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env(constants::LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("envseal=debug")
        } else {
            EnvFilter::new("envseal=warn")
        }
    });

    // Logs go to stderr; stdout belongs to the target after handoff.
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();

    if let Err(e) = execute(cli.command, cli.config) {
        output::error(&e.to_string());
        if let Some(hint) = e.hint() {
            output::hint(hint);
        }
        std::process::exit(constants::EXIT_FAILURE);
    }
}
