// /////////////////////////////////////////////////////////////////////////////
// Vaultsync
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Exit Code Mapping
//!
//! §6 of the external contract is deliberately flat: `0` on success, `1`
//! on any failure, whether it is a usage error, a configuration error,
//! an I/O failure, or an integrity failure. Unlike bootstrap layers that
//! map onto a richer `sysexits`-style code table, vaultsync collapses
//! everything non-zero to a single value — the taxonomy in
//! `VaultSyncError` still distinguishes failure kinds for logging and
//! tests, it just doesn't surface them as distinct process exit codes.

/// Successful process exit.
pub const EXIT_SUCCESS: i32 = 0;

/// Any failure: usage, configuration, I/O, or integrity.
pub const EXIT_FAILURE: i32 = 1;

/// Maps a `Result` onto the process's exit code.
pub fn exit_code_for<T, E>(result: &Result<T, E>) -> i32 {
    match result {
        Ok(_) => EXIT_SUCCESS,
        Err(_) => EXIT_FAILURE,
    }
}
