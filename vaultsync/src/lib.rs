// /////////////////////////////////////////////////////////////////////////////
// Vaultsync
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Vaultsync
//!
//! Synchronizes a tree of files between two endpoints — a local
//! filesystem root or an object-store bucket+prefix — optionally
//! wrapped in client-side AES-256-GCM encryption, with support for
//! initiating cold-tier restores ahead of a sync.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │        Application Layer            │
//! │  differ · sync_driver · restore_    │
//! │  driver · uri · secrets             │
//! └─────────────────┬───────────────────┘
//! ┌─────────────────┴───────────────────┐
//! │      Infrastructure Layer           │
//! │  crypto · filesystem · object_store │
//! │  · encryption (Endpoint adapters)   │
//! └─────────────────┬───────────────────┘
//! ┌─────────────────┴───────────────────┐
//! │           Domain Layer              │
//! │  (vaultsync-domain: Entry, Action,  │
//! │   Endpoint port, VaultSyncError)    │
//! └─────────────────────────────────────┘
//! ```
//!
//! The `vaultsync-bootstrap` crate sits outside this stack entirely,
//! handling CLI parsing, tracing setup, and exit-code mapping.

pub mod application;
pub mod infrastructure;

pub use vaultsync_domain::{Action, Entry, Endpoint, ObjectMetadata, RelativePath, VaultSyncError};
