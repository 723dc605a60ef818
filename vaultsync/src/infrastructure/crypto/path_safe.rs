// /////////////////////////////////////////////////////////////////////////////
// Vaultsync
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Path-Safe Encoding
//!
//! Encrypted filenames are base64 bytes, but object-store keys and
//! filesystem path separators must not appear inside an encoded name.
//! `encode` base64-encodes and then substitutes every `/` for `_`;
//! `decode` reverses both steps.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use vaultsync_domain::VaultSyncError;

/// Base64-encodes `bytes`, then replaces `/` with `_`.
pub fn encode(bytes: &[u8]) -> String {
    BASE64.encode(bytes).replace('/', "_")
}

/// Reverses [`encode`]: replaces `_` with `/`, then base64-decodes.
pub fn decode(text: &str) -> Result<Vec<u8>, VaultSyncError> {
    let restored = text.replace('_', "/");
    BASE64
        .decode(restored.as_bytes())
        .map_err(|e| VaultSyncError::integrity(format!("invalid path-safe encoding: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_arbitrary_bytes() {
        let original = vec![0u8, 1, 2, 250, 251, 252, 253, 254, 255, 62, 63];
        let encoded = encode(&original);
        assert!(!encoded.contains('/'));
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn output_never_contains_forward_slash() {
        // Bytes chosen so base64's standard alphabet emits '/' before substitution.
        let original: Vec<u8> = (0..=255).collect();
        let encoded = encode(&original);
        assert!(!encoded.contains('/'));
    }
}
