// /////////////////////////////////////////////////////////////////////////////
// Vaultsync
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Command-Line Interface Module
//!
//! Bootstrap-layer CLI handling.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │  1. parse_cli()                     │  Parse CLI with clap
//! └─────────────────┬───────────────────┘
//!                   ↓
//! ┌─────────────────────────────────────┐
//! │  2. validate_cli()                  │  Usage-error validation
//! └─────────────────┬───────────────────┘
//!                   ↓
//! ┌─────────────────────────────────────┐
//! │  3. ValidatedCli                    │  Safe, validated config
//! └─────────────────────────────────────┘
//! ```
//!
//! The grammar from the external contract: `--key=value` options only,
//! two subcommands (`sync`, `restore`), and a default restore-request
//! document when `--restore-request` is omitted.

use clap::{Parser, Subcommand};
use std::fmt;

/// Default restore-request document used when `--restore-request` is not
/// given on the command line.
pub const DEFAULT_RESTORE_REQUEST: &str = r#"{"Days":5,"GlacierJobParameters":{"Tier":"Bulk"}}"#;

/// Default object-store storage class applied to writes.
pub const DEFAULT_STORAGE_CLASS: &str = "DEEP_ARCHIVE";

#[derive(Parser, Debug)]
#[command(name = "vaultsync", about = "Synchronizes a tree of files between two endpoints")]
pub struct Cli {
    /// Path to a JSON secrets file (password / access key id / secret
    /// access key / session token / region).
    #[arg(long)]
    pub secrets: Option<String>,

    /// Object-store storage class applied on writes.
    #[arg(long, default_value = DEFAULT_STORAGE_CLASS)]
    pub storage_class: String,

    /// JSON document passed as the restore-request body.
    #[arg(long)]
    pub restore_request: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Make `target`'s contents equal to `source`'s.
    Sync { source: String, target: String },
    /// Initiate archive-tier retrieval for every archived object under `target`.
    Restore { target: String },
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// A CLI-level usage error: the argument contract from §6 was violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub arg: String,
    pub reason: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid value for --{}: {}", self.arg, self.reason)
    }
}

impl std::error::Error for ParseError {}

impl ParseError {
    fn new(arg: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { arg: arg.into(), reason: reason.into() }
    }
}

/// CLI arguments after usage validation.
#[derive(Debug, Clone)]
pub struct ValidatedCli {
    pub secrets_path: Option<String>,
    pub storage_class: String,
    pub restore_request: String,
    pub command: ValidatedCommand,
}

#[derive(Debug, Clone)]
pub enum ValidatedCommand {
    Sync { source: String, target: String },
    Restore { target: String },
}

/// Parses and validates CLI arguments.
///
/// Combines `parse_cli()` with `validate_cli()`: everything clap's
/// grammar can't express (non-empty secrets path, a restore-request
/// literal that actually parses as JSON) is checked here before any I/O
/// happens, per §7's "usage and configuration errors abort ... before
/// any I/O" policy.
pub fn parse_and_validate() -> Result<ValidatedCli, ParseError> {
    let cli = parse_cli();
    validate_cli(cli)
}

fn non_empty(arg: &str, value: &str) -> Result<(), ParseError> {
    if value.trim().is_empty() {
        Err(ParseError::new(arg, "must not be empty"))
    } else {
        Ok(())
    }
}

fn validate_cli(cli: Cli) -> Result<ValidatedCli, ParseError> {
    if let Some(ref secrets) = cli.secrets {
        non_empty("secrets", secrets)?;
    }
    non_empty("storage-class", &cli.storage_class)?;

    let restore_request = match cli.restore_request {
        Some(literal) => {
            non_empty("restore-request", &literal)?;
            serde_json::from_str::<serde_json::Value>(&literal)
                .map_err(|e| ParseError::new("restore-request", format!("not valid JSON: {e}")))?;
            literal
        }
        None => DEFAULT_RESTORE_REQUEST.to_string(),
    };

    let command = match cli.command {
        Commands::Sync { source, target } => {
            non_empty("source", &source)?;
            non_empty("target", &target)?;
            ValidatedCommand::Sync { source, target }
        }
        Commands::Restore { target } => {
            non_empty("target", &target)?;
            ValidatedCommand::Restore { target }
        }
    };

    Ok(ValidatedCli {
        secrets_path: cli.secrets,
        storage_class: cli.storage_class,
        restore_request,
        command,
    })
}
