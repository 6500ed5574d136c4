//! file-cache - command-line access to bounded file cache stores
//!
//! Reads, writes and clears the JSON store files used by services that cache
//! lookups through the `bounded-file-cache` crate.

mod cli;
mod error;

use crate::cli::{run, Cli};
use crate::error::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{prelude::*, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "bounded_file_cache=warn,file_cache=info";

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging() {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(outcome) => outcome.into(),
        Err(e) => {
            eprintln!("file-cache: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging() -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))?;

    // Logs go to stderr so stdout only carries command output.
    // LOG_FORMAT=json switches to structured Cloud Logging output.
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    };

    Ok(())
}
