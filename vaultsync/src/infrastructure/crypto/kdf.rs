// /////////////////////////////////////////////////////////////////////////////
// Vaultsync
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Key Derivation
//!
//! Derives the single 32-byte key used for both body encryption and
//! synthetic filename IVs from a user-supplied password, via scrypt with
//! a fixed salt.
//!
//! The salt is deliberately constant (`"salt"`): two installs sharing a
//! password derive the same key, so filename ciphertexts are stable
//! across hosts. This is a compatibility property of the on-disk format,
//! not a defect to silently "fix" — changing it would break every
//! existing encrypted backup (see the design notes on the fixed scrypt
//! salt).

use scrypt::{scrypt, Params};
use vaultsync_domain::VaultSyncError;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The scrypt salt every vaultsync install uses, by design.
const FIXED_SALT: &[u8] = b"salt";

/// Output length of the derived key, in bytes.
const KEY_LEN: usize = 32;

/// `log2(N) = 14` (`N = 16384`), `r = 8`, `p = 1` — scrypt's own
/// "interactive logins" recommendation and the default most scrypt
/// bindings ship with.
fn default_params() -> Params {
    Params::new(14, 8, 1, KEY_LEN).expect("static scrypt parameters are always valid")
}

/// A derived key that zeroizes its bytes on drop.
///
/// Cloning is intentionally not derived: every endpoint that needs the
/// key constructs it once via [`derive_key`] and shares it behind an
/// `Arc` rather than copying the raw bytes around.
#[derive(ZeroizeOnDrop)]
pub struct DerivedKey(Vec<u8>);

impl DerivedKey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Derives the 32-byte key for `password` using scrypt with the fixed
/// salt `"salt"`.
pub fn derive_key(password: &str) -> Result<DerivedKey, VaultSyncError> {
    let mut out = vec![0u8; KEY_LEN];
    scrypt(password.as_bytes(), FIXED_SALT, &default_params(), &mut out)
        .map_err(|e| VaultSyncError::configuration(format!("scrypt key derivation failed: {e}")))?;
    let key = DerivedKey(out.clone());
    out.zeroize();
    Ok(key)
}
