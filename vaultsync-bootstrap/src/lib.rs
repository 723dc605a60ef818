// /////////////////////////////////////////////////////////////////////////////
// Vaultsync
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Bootstrap Module
//!
//! The bootstrap module sits **outside** the application/infrastructure
//! layers in `vaultsync` and provides:
//!
//! - **Argument parsing** - clap derive parsing plus usage validation
//! - **Logging setup** - process-wide `tracing` subscriber installation
//! - **Exit-code mapping** - the flat 0/1 contract from §6
//!
//! Unlike a bootstrap layer with a platform abstraction and a signal/
//! shutdown coordinator, vaultsync's concurrency model is single-threaded
//! and has no explicit cancellation protocol (a user interrupt just
//! terminates the process), so this module carries none of that
//! machinery.
//!
//! ## Module Structure
//!
//! - `cli` - argument parsing and validation
//! - `exit_code` - the 0/1 exit-code mapping
//! - `logger` - bootstrap-phase logging and `tracing` subscriber setup
//!
//! ## Usage Example
//!
//! ```no_run
//! use vaultsync_bootstrap::{bootstrap_cli, exit_code::exit_code_for};
//!
//! fn main() -> std::process::ExitCode {
//!     let validated_cli = match bootstrap_cli() {
//!         Ok(cli) => cli,
//!         Err(e) => {
//!             eprintln!("{e}");
//!             return std::process::ExitCode::from(1);
//!         }
//!     };
//!
//!     vaultsync_bootstrap::logger::init_tracing(false);
//!     let result: Result<(), String> = Ok(()); // application logic goes here
//!     std::process::ExitCode::from(exit_code_for(&result) as u8)
//! }
//! ```

pub mod cli;
pub mod exit_code;
pub mod logger;

pub use cli::{parse_and_validate, ParseError, ValidatedCli, ValidatedCommand};
pub use exit_code::{exit_code_for, EXIT_FAILURE, EXIT_SUCCESS};

/// Parses and validates CLI arguments.
///
/// This is the main entry point for the bootstrap layer. The caller is
/// responsible for running the application logic and mapping the result
/// to an exit code with [`exit_code::exit_code_for`].
pub fn bootstrap_cli() -> Result<ValidatedCli, cli::ParseError> {
    cli::parse_and_validate()
}
