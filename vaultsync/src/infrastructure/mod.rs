// /////////////////////////////////////////////////////////////////////////////
// Vaultsync
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Infrastructure layer: concrete `Endpoint` adapters (filesystem,
//! object store, encryption) and the crypto primitives they share.

pub mod adapters;
pub mod crypto;
