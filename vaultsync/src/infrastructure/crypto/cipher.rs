// /////////////////////////////////////////////////////////////////////////////
// Vaultsync
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Body Cipher
//!
//! AES-256-GCM encryption/decryption of a single body (a file or a
//! filename's UTF-8 bytes) under the framing from §4.A:
//!
//! ```text
//! 0x01 || IV[16] || ciphertext || tag[16]
//! ```
//!
//! AES-GCM's standard nonce is 96 bits, but the format calls for a
//! 16-byte IV (so that filename IVs can be derived from the same
//! synthetic-IV construction used for the HMAC chain). The `aes-gcm`
//! crate's [`AesGcm`] type is generic over nonce size for exactly this
//! case: `AesGcm<Aes256, U16>` runs GCM's GHASH-based nonce processing
//! instead of the fast-path 96-bit construction, but is otherwise a
//! normal AES-256-GCM instance.
//!
//! There is no incremental/streaming AEAD API wired up here: every body
//! is authenticated by a single tag, so encryption reads the whole
//! plaintext into memory, calls `encrypt_in_place` once, and frames the
//! result. Callers that need this exposed as a [`ByteStream`] use
//! [`stream_of`] and [`collect_stream`] to cross that boundary; see
//! `infrastructure::adapters::encryption` for where that happens.

use aes_gcm::aead::generic_array::typenum::U16;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::{AesGcm, Key};
use futures::StreamExt;
use rand::RngCore;
use vaultsync_domain::services::ByteStream;
use vaultsync_domain::VaultSyncError;

/// The one supported framing version.
pub const VERSION: u8 = 1;

/// IV length in bytes, for both body and filename encryption.
pub const IV_LEN: usize = 16;

/// AES-GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Total per-body framing overhead: `1 + IV_LEN + TAG_LEN`.
pub const FRAMING_OVERHEAD: u64 = 1 + IV_LEN as u64 + TAG_LEN as u64;

/// AES-256-GCM with a 16-byte (128-bit) nonce.
type Cipher = AesGcm<Aes256, U16>;

fn build_cipher(key: &[u8]) -> Cipher {
    let key = Key::<Cipher>::from_slice(key);
    Cipher::new(key)
}

/// Encrypts `plaintext` with a fresh random IV, producing the full framed
/// body: `0x01 || IV[16] || ciphertext || tag[16]`.
pub fn encrypt_body(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, VaultSyncError> {
    let mut iv = [0u8; IV_LEN];
    rand::rng().fill_bytes(&mut iv);
    encrypt_body_with_iv(key, plaintext, &iv)
}

/// Encrypts `plaintext` with an explicit IV. Used directly by filename
/// encryption, which derives a synthetic (non-random) IV; body encryption
/// goes through [`encrypt_body`] instead.
pub fn encrypt_body_with_iv(key: &[u8], plaintext: &[u8], iv: &[u8; IV_LEN]) -> Result<Vec<u8>, VaultSyncError> {
    let cipher = build_cipher(key);
    let nonce = GenericArray::from_slice(iv.as_slice());
    let mut buffer = plaintext.to_vec();
    cipher
        .encrypt_in_place(nonce, b"", &mut buffer)
        .map_err(|e| VaultSyncError::integrity(format!("AES-256-GCM encryption failed: {e}")))?;

    let mut framed = Vec::with_capacity(1 + IV_LEN + buffer.len());
    framed.push(VERSION);
    framed.extend_from_slice(iv);
    framed.extend_from_slice(&buffer);
    Ok(framed)
}

/// Decrypts a framed body, verifying the version header and the trailing
/// authentication tag. Fails with an integrity error on a short input, an
/// unsupported version, or a tag mismatch.
pub fn decrypt_body(key: &[u8], framed: &[u8]) -> Result<Vec<u8>, VaultSyncError> {
    if (framed.len() as u64) < FRAMING_OVERHEAD {
        return Err(VaultSyncError::integrity(
            "ciphertext shorter than the 33-byte framing overhead",
        ));
    }

    let version = framed[0];
    if version != VERSION {
        return Err(VaultSyncError::integrity(format!(
            "unsupported encryption version {version}"
        )));
    }

    let iv = &framed[1..1 + IV_LEN];
    let sealed = &framed[1 + IV_LEN..];

    let cipher = build_cipher(key);
    let nonce = GenericArray::from_slice(iv);
    let mut buffer = sealed.to_vec();
    cipher
        .decrypt_in_place(nonce, b"", &mut buffer)
        .map_err(|_| VaultSyncError::integrity("AES-256-GCM authentication failed"))?;

    Ok(buffer)
}

/// Wraps an in-memory buffer as a single-chunk [`ByteStream`].
pub fn stream_of(bytes: Vec<u8>) -> ByteStream {
    Box::pin(futures::stream::once(async move { Ok(bytes) }))
}

/// Drains a [`ByteStream`] into a single in-memory buffer.
pub async fn collect_stream(mut stream: ByteStream) -> Result<Vec<u8>, VaultSyncError> {
    let mut buffer = Vec::new();
    while let Some(chunk) = stream.next().await {
        buffer.extend_from_slice(&chunk?);
    }
    Ok(buffer)
}
