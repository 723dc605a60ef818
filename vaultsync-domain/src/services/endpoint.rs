// /////////////////////////////////////////////////////////////////////////////
// Vaultsync
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Endpoint Port
//!
//! The polymorphic contract every backend (filesystem, object store, the
//! encryption wrapper) satisfies. This is an **infrastructure port**
//! expressed in the domain layer: its methods are `async` even though the
//! domain crate itself performs no I/O, the same rationale the teacher
//! applies to its own file I/O port — the operations are I/O-bound, not
//! CPU-bound, and belong behind an async boundary regardless of which
//! layer declares the trait.
//!
//! Endpoints are composed by wrapping rather than inheritance: a
//! filesystem or object-store endpoint is a leaf; the encryption wrapper
//! is a decorator that owns an inner `Box<dyn Endpoint>` for the duration
//! of a sync. `restore` and `head` are only meaningful for object-store
//! backends (and wrappers around them); the default implementations
//! return [`VaultSyncError::Unsupported`] so a filesystem endpoint need
//! not override them.

use crate::entry::Entry;
use crate::error::VaultSyncError;
use crate::object_metadata::ObjectMetadata;
use crate::relative_path::RelativePath;
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

/// One chunk of a byte stream flowing through read/write/cipher pipelines.
pub type ByteChunk = Vec<u8>;

/// A lazily-produced stream of byte chunks, used for both `read` results
/// and `write` inputs.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<ByteChunk, VaultSyncError>> + Send>>;

/// A lazy, finite sequence of entries, as returned by `list()`. Order is
/// backend-defined; the differ is responsible for sorting.
pub type EntryStream = Pin<Box<dyn Stream<Item = Result<Entry, VaultSyncError>> + Send>>;

/// The capability set every sync endpoint exposes.
///
/// Implementations report plaintext-equivalent semantics up the stack:
/// the encryption wrapper is the only implementation that transforms
/// paths and sizes before delegating to an inner endpoint.
#[async_trait]
pub trait Endpoint: Send + Sync {
    /// A human-readable identifier for log lines (e.g. `file:///data` or
    /// `enc+s3://bucket/prefix`).
    fn name(&self) -> String;

    /// A lazy sequence of entries. Must be finite and terminate; order is
    /// not guaranteed to be sorted.
    async fn list(&self) -> Result<EntryStream, VaultSyncError>;

    /// The entry's plaintext size in bytes.
    async fn size(&self, path: &RelativePath) -> Result<u64, VaultSyncError>;

    /// A readable byte stream of the entry's plaintext content.
    async fn read(&self, path: &RelativePath) -> Result<ByteStream, VaultSyncError>;

    /// Writes `stream` (`size` plaintext bytes) under `path`, creating
    /// intermediate directories on leaf backends. Resolves only once all
    /// bytes are durable from the backend's perspective.
    async fn write(&self, path: &RelativePath, stream: ByteStream, size: u64) -> Result<(), VaultSyncError>;

    /// Deletes the entry. Fails if missing.
    async fn remove(&self, path: &RelativePath) -> Result<(), VaultSyncError>;

    /// Whether this backend can accept a write of `size` bytes at `path`.
    fn is_write_supported(&self, path: &RelativePath, size: u64) -> bool;

    /// Initiates archive-tier retrieval. Only meaningful for object-store
    /// endpoints and wrappers around them.
    async fn restore(&self, path: &RelativePath) -> Result<(), VaultSyncError> {
        let _ = path;
        Err(VaultSyncError::unsupported(format!("{} does not support restore", self.name())))
    }

    /// Returns backend metadata including restore state. Only meaningful
    /// for object-store endpoints and wrappers around them.
    async fn head(&self, path: &RelativePath) -> Result<ObjectMetadata, VaultSyncError> {
        let _ = path;
        Err(VaultSyncError::unsupported(format!("{} does not support head", self.name())))
    }
}
