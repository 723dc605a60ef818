// /////////////////////////////////////////////////////////////////////////////
// Vaultsync
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Domain services: ports implemented by the infrastructure layer.

pub mod endpoint;

pub use endpoint::{ByteChunk, ByteStream, Endpoint, EntryStream};
