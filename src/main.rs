//! fct-provision: example provisioning for generated FLASC projects.
//!
//! This is the main entry point for the `fct-provision` CLI. It parses
//! arguments, sets up logging, dispatches to the appropriate command handler,
//! and handles errors with proper exit codes.

mod cli;
mod commands;
pub mod archive;
pub mod config;
pub mod context;
pub mod error;
pub mod exit_codes;
pub mod fetch;
pub mod fs;
pub mod notebook;
pub mod provision;
pub mod prune;
pub mod recipes;
pub mod workspace;

#[cfg(test)]
mod test_support;

use cli::Cli;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Log to stderr so stdout carries only the run summary.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "fct_provision=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_tracing();

    match commands::dispatch(cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);
            if err.is_retryable() {
                eprintln!("This failure may be transient; re-running may succeed.");
            }

            ExitCode::from(err.exit_code() as u8)
        }
    }
}
