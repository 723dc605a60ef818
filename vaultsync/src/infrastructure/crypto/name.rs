// /////////////////////////////////////////////////////////////////////////////
// Vaultsync
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Encrypted Filename Codec
//!
//! Composes [`synthetic_iv`], [`cipher`], and [`path_safe`] into
//! `encrypt_name`/`decrypt_name`, exactly as §4.A defines
//! `encrypt_name(key, name)`: body-encrypt `name`'s UTF-8 bytes under the
//! name's synthetic IV, then path-safe-encode the framed result.

use super::{cipher, path_safe, synthetic_iv};
use vaultsync_domain::VaultSyncError;

/// Deterministically encrypts `name` under `key`, returning a path-safe
/// ciphertext string suitable as an inner-backend key or filename.
pub fn encrypt_name(key: &[u8], name: &str) -> Result<String, VaultSyncError> {
    let iv = synthetic_iv::synthetic_iv(key, name);
    let framed = cipher::encrypt_body_with_iv(key, name.as_bytes(), &iv)?;
    Ok(path_safe::encode(&framed))
}

/// Reverses [`encrypt_name`].
pub fn decrypt_name(key: &[u8], encoded: &str) -> Result<String, VaultSyncError> {
    let framed = path_safe::decode(encoded)?;
    let plaintext = cipher::decrypt_body(key, &framed)?;
    String::from_utf8(plaintext).map_err(|e| VaultSyncError::integrity(format!("decrypted filename is not valid UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8; 32] = b"01234567890123456789012345678901";

    #[test]
    fn round_trips_a_plain_name() {
        let encrypted = encrypt_name(KEY, "test.txt").unwrap();
        assert_eq!(decrypt_name(KEY, &encrypted).unwrap(), "test.txt");
    }

    #[test]
    fn round_trips_a_nested_path() {
        let encrypted = encrypt_name(KEY, "prefix1/test.txt").unwrap();
        assert_eq!(decrypt_name(KEY, &encrypted).unwrap(), "prefix1/test.txt");
    }

    #[test]
    fn is_deterministic_for_fixed_key_and_name() {
        assert_eq!(encrypt_name(KEY, "a.txt").unwrap(), encrypt_name(KEY, "a.txt").unwrap());
    }

    #[test]
    fn is_path_safe() {
        for name in ["a.txt", "a/b/c.txt", "日本語.txt", "a very long file name indeed.bin"] {
            let encrypted = encrypt_name(KEY, name).unwrap();
            assert!(!encrypted.contains('/'), "{encrypted} contains '/'");
        }
    }

    #[test]
    fn different_names_encrypt_differently() {
        assert_ne!(encrypt_name(KEY, "a.txt").unwrap(), encrypt_name(KEY, "b.txt").unwrap());
    }
}
