// /////////////////////////////////////////////////////////////////////////////
// Vaultsync
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Domain error type.
//!
//! A single flat enum covers the taxonomy a sync can hit: bad arguments,
//! unreadable configuration, backend I/O failures, and the integrity
//! failures the encryption layer can raise. Callers that need to map an
//! error onto a process exit code use [`VaultSyncError::is_usage`] and
//! [`VaultSyncError::is_integrity`] rather than matching on variants
//! directly, so the mapping stays in one place.

use thiserror::Error;

/// Errors that can occur anywhere in a sync or restore.
#[derive(Error, Debug, Clone)]
pub enum VaultSyncError {
    /// Bad CLI arguments, an unknown URI scheme, or a malformed path.
    #[error("usage error: {0}")]
    Usage(String),

    /// An unreadable secrets file, missing secret field, or invalid
    /// `--restore-request` JSON.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A filesystem or object-store operation failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// AES-GCM tag mismatch, unsupported encryption version, or truncated
    /// ciphertext.
    #[error("integrity error: {0}")]
    Integrity(String),

    /// A capability the caller asked for is not implemented by this
    /// endpoint (`restore`/`head` on a filesystem backend, a write beyond
    /// the encryption wrapper's 64 GiB ceiling).
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// A `path` field failed [`RelativePath`](crate::relative_path::RelativePath)'s invariants.
    #[error("invalid path: {0}")]
    InvalidPath(String),
}

impl VaultSyncError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    pub fn integrity(msg: impl Into<String>) -> Self {
        Self::Integrity(msg.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::InvalidPath(msg.into())
    }

    /// True for errors that must abort before any I/O is attempted: bad
    /// arguments or unreadable configuration.
    pub fn is_usage(&self) -> bool {
        matches!(self, VaultSyncError::Usage(_) | VaultSyncError::Configuration(_))
    }

    /// True for AEAD authentication failures and framing violations.
    pub fn is_integrity(&self) -> bool {
        matches!(self, VaultSyncError::Integrity(_))
    }

    pub fn category(&self) -> &'static str {
        match self {
            VaultSyncError::Usage(_) => "usage",
            VaultSyncError::Configuration(_) => "configuration",
            VaultSyncError::Io(_) => "io",
            VaultSyncError::Integrity(_) => "integrity",
            VaultSyncError::Unsupported(_) => "unsupported",
            VaultSyncError::InvalidPath(_) => "invalid_path",
        }
    }
}

impl From<std::io::Error> for VaultSyncError {
    fn from(err: std::io::Error) -> Self {
        VaultSyncError::Io(err.to_string())
    }
}
