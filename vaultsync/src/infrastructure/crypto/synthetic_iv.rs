// /////////////////////////////////////////////////////////////////////////////
// Vaultsync
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Synthetic IV Derivation
//!
//! Filenames must encrypt deterministically so listings can be
//! deduplicated and updates overwrite the prior ciphertext for the same
//! name. The IV is derived from the key and the plaintext name alone:
//!
//! ```text
//! H1 = HMAC-SHA256(key, "S7" || "aes-256-gcm")
//! H2 = HMAC-SHA256(H1, filename_utf8)
//! IV = last 16 bytes of H2
//! ```
//!
//! Binding the IV to both the key and the name means the same filename
//! encrypts identically across runs under the same key, while different
//! keys yield different IVs for the same name.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// The domain-separation label mixed into `H1`.
const DOMAIN_LABEL: &[u8] = b"S7aes-256-gcm";

/// Derives the 16-byte synthetic IV for `filename` under `key`.
pub fn synthetic_iv(key: &[u8], filename: &str) -> [u8; 16] {
    let h1 = hmac_sha256(key, DOMAIN_LABEL);
    let h2 = hmac_sha256(&h1, filename.as_bytes());
    let mut iv = [0u8; 16];
    iv.copy_from_slice(&h2[16..32]);
    iv
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&mac.finalize().into_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_fixed_key_and_name() {
        let key = b"0123456789abcdef0123456789abcdef";
        let iv1 = synthetic_iv(key, "test.txt");
        let iv2 = synthetic_iv(key, "test.txt");
        assert_eq!(iv1, iv2);
    }

    #[test]
    fn differs_for_different_names() {
        let key = b"0123456789abcdef0123456789abcdef";
        assert_ne!(synthetic_iv(key, "a.txt"), synthetic_iv(key, "b.txt"));
    }

    #[test]
    fn differs_for_different_keys() {
        assert_ne!(synthetic_iv(b"key-one", "same-name"), synthetic_iv(b"key-two", "same-name"));
    }
}
