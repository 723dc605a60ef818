// /////////////////////////////////////////////////////////////////////////////
// Vaultsync
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Crypto Primitives (component A)
//!
//! Key derivation, the AES-256-GCM body cipher, the synthetic-IV
//! construction for filenames, and the path-safe text codec. Every other
//! module that needs encryption — the encryption wrapper backend above
//! all — goes through this module rather than touching `aes_gcm` or
//! `scrypt` directly.

pub mod cipher;
pub mod kdf;
pub mod name;
pub mod path_safe;
pub mod synthetic_iv;

pub use cipher::FRAMING_OVERHEAD;
pub use kdf::{derive_key, DerivedKey};
pub use name::{decrypt_name, encrypt_name};
