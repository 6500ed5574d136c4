//! Command-line arguments and command execution

use crate::error::Result;
use bounded_file_cache::{parse_positive, Store, StoreConfig};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

/// Inspect and edit bounded file cache stores.
///
/// Settings fall back to FILE_CACHE_DIR, FILE_CACHE_EXPIRY_MS and FILE_CACHE_MAX_FILE_SIZE.
#[derive(Debug, Parser)]
#[command(name = "file-cache", version)]
pub struct Cli {
    /// Namespace of the store, usually the application name
    #[arg(short, long)]
    pub namespace: String,

    /// Name of the store inside the namespace
    #[arg(short, long)]
    pub store: String,

    /// Directory holding the store files
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Expiry window in milliseconds
    #[arg(long, value_name = "MS")]
    pub expiry_ms: Option<String>,

    /// Size ceiling in bytes
    #[arg(long, value_name = "BYTES")]
    pub max_file_size: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Print the value stored under KEY as JSON
    Get { key: String },
    /// Store VALUE under KEY. VALUE is parsed as JSON, or kept as a plain string.
    Set { key: String, value: String },
    /// Reset the store to an empty file
    Clear,
    /// Print the path of the backing file
    Path,
}

/// Result of a command, mapped to the process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Missing,
    OverLimit,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Done => ExitCode::SUCCESS,
            Outcome::Missing => ExitCode::from(1),
            Outcome::OverLimit => ExitCode::from(2),
        }
    }
}

impl Cli {
    /// Layer command-line flags over `config`
    pub fn apply_overrides(&self, mut config: StoreConfig) -> Result<StoreConfig> {
        if let Some(dir) = &self.dir {
            config.directory = Some(dir.clone());
        }
        if let Some(expiry_ms) = &self.expiry_ms {
            config.expiry_ms = Some(parse_positive("--expiry-ms", expiry_ms)?);
        }
        if let Some(max_file_size) = &self.max_file_size {
            config.max_file_size = Some(parse_positive("--max-file-size", max_file_size)?);
        }
        Ok(config)
    }

    pub fn open_store(&self, config: StoreConfig) -> Result<Store> {
        let options = self.apply_overrides(config)?.into_options();
        Ok(Store::with_options(&self.namespace, &self.store, options)?)
    }
}

pub fn run(cli: &Cli) -> Result<Outcome> {
    let store = cli.open_store(StoreConfig::from_env()?)?;
    let stdout = std::io::stdout();
    execute(&store, &cli.command, &mut stdout.lock())
}

pub fn execute<W: Write>(store: &Store, command: &Command, out: &mut W) -> Result<Outcome> {
    match command {
        Command::Get { key } => match store.get_item(key)? {
            Some(value) => {
                writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
                Ok(Outcome::Done)
            }
            None => Ok(Outcome::Missing),
        },
        Command::Set { key, value } => {
            let within_limit = store.set_item(key, parse_value(value))?;
            writeln!(out, "within_limit={within_limit}")?;
            if within_limit {
                Ok(Outcome::Done)
            } else {
                Ok(Outcome::OverLimit)
            }
        }
        Command::Clear => {
            store.clear_cache()?;
            Ok(Outcome::Done)
        }
        Command::Path => {
            writeln!(out, "{}", store.file_path().display())?;
            Ok(Outcome::Done)
        }
    }
}

/// Parse a value as JSON, keeping it as a string when it is not valid JSON
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
