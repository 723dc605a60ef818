// /////////////////////////////////////////////////////////////////////////////
// Vaultsync
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Vaultsync Domain
//!
//! Pure, reusable types shared by every sync component: [`Entry`],
//! [`Action`], [`RelativePath`], [`ObjectMetadata`], the [`Endpoint`] port,
//! and the [`VaultSyncError`] error type. This crate performs no I/O;
//! concrete backends (filesystem, object store, encryption wrapper) live
//! in the `vaultsync` crate and implement the `Endpoint` trait defined
//! here.

pub mod action;
pub mod entry;
pub mod error;
pub mod object_metadata;
pub mod relative_path;
pub mod services;

pub use action::Action;
pub use entry::Entry;
pub use error::VaultSyncError;
pub use object_metadata::ObjectMetadata;
pub use relative_path::RelativePath;
pub use services::{ByteChunk, ByteStream, Endpoint, EntryStream};
