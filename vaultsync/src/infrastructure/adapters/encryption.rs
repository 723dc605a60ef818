// /////////////////////////////////////////////////////////////////////////////
// Vaultsync
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Encryption Wrapper Backend (component E)
//!
//! Decorates any [`Endpoint`] with client-side AES-256-GCM encryption:
//! names are encrypted with the synthetic-IV construction so listings
//! stay deduplicated and updates overwrite the prior ciphertext; bodies
//! are encrypted with a fresh random IV per write. This is the only
//! `Endpoint` implementation that transforms paths and sizes before
//! delegating — §4.E's "transparent" framing.

use async_trait::async_trait;
use std::sync::Arc;
use vaultsync_domain::services::{ByteStream, Endpoint, EntryStream};
use vaultsync_domain::{Entry, ObjectMetadata, RelativePath, VaultSyncError};

use crate::infrastructure::crypto::{cipher, name as name_codec, DerivedKey};

/// 64 GiB — the encryption layer's self-imposed ceiling on a single
/// authentication tag's coverage (§4.E).
pub const MAX_ENCRYPTED_WRITE_SIZE: u64 = 64 * 1024 * 1024 * 1024;

/// Wraps `inner` in client-side encryption. Owns `inner` for the
/// duration of the sync, per §3's composition-by-wrapping model.
pub struct EncryptionEndpoint {
    key: Arc<DerivedKey>,
    inner: Box<dyn Endpoint>,
}

impl EncryptionEndpoint {
    pub fn new(key: DerivedKey, inner: Box<dyn Endpoint>) -> Self {
        Self {
            key: Arc::new(key),
            inner,
        }
    }

    fn encrypt_path(&self, path: &RelativePath) -> Result<RelativePath, VaultSyncError> {
        let encrypted = name_codec::encrypt_name(self.key.as_bytes(), path.as_str())?;
        RelativePath::new(encrypted)
    }
}

#[async_trait]
impl Endpoint for EncryptionEndpoint {
    fn name(&self) -> String {
        format!("enc+{}", self.inner.name())
    }

    async fn list(&self) -> Result<EntryStream, VaultSyncError> {
        use futures::StreamExt;

        let inner_entries: Vec<_> = self.inner.list().await?.collect().await;
        let mut decrypted = Vec::with_capacity(inner_entries.len());

        for entry in inner_entries {
            let entry = entry?;
            let plain_name = name_codec::decrypt_name(self.key.as_bytes(), entry.path.as_str())?;
            let plain_path = RelativePath::new(plain_name)?;

            let plain_size = entry
                .size
                .checked_sub(cipher::FRAMING_OVERHEAD)
                .ok_or_else(|| VaultSyncError::integrity(format!("{} is smaller than the encryption framing overhead", entry.path)))?;

            decrypted.push(Ok(Entry::new(plain_path, plain_size, entry.mtime_ms)));
        }

        Ok(Box::pin(futures::stream::iter(decrypted)))
    }

    async fn size(&self, path: &RelativePath) -> Result<u64, VaultSyncError> {
        let inner_path = self.encrypt_path(path)?;
        let inner_size = self.inner.size(&inner_path).await?;
        inner_size
            .checked_sub(cipher::FRAMING_OVERHEAD)
            .ok_or_else(|| VaultSyncError::integrity(format!("{path} is smaller than the encryption framing overhead")))
    }

    async fn read(&self, path: &RelativePath) -> Result<ByteStream, VaultSyncError> {
        let inner_path = self.encrypt_path(path)?;
        let framed = cipher::collect_stream(self.inner.read(&inner_path).await?).await?;
        let plaintext = cipher::decrypt_body(self.key.as_bytes(), &framed)?;
        Ok(cipher::stream_of(plaintext))
    }

    async fn write(&self, path: &RelativePath, stream: ByteStream, size: u64) -> Result<(), VaultSyncError> {
        let plaintext = cipher::collect_stream(stream).await?;
        let framed = cipher::encrypt_body(self.key.as_bytes(), &plaintext)?;
        let inner_path = self.encrypt_path(path)?;
        self.inner.write(&inner_path, cipher::stream_of(framed), size + cipher::FRAMING_OVERHEAD).await
    }

    async fn remove(&self, path: &RelativePath) -> Result<(), VaultSyncError> {
        let inner_path = self.encrypt_path(path)?;
        self.inner.remove(&inner_path).await
    }

    fn is_write_supported(&self, path: &RelativePath, size: u64) -> bool {
        if size > MAX_ENCRYPTED_WRITE_SIZE {
            return false;
        }
        let Ok(inner_path) = self.encrypt_path(path) else {
            return false;
        };
        self.inner.is_write_supported(&inner_path, size + cipher::FRAMING_OVERHEAD)
    }

    async fn restore(&self, path: &RelativePath) -> Result<(), VaultSyncError> {
        let inner_path = self.encrypt_path(path)?;
        self.inner.restore(&inner_path).await
    }

    async fn head(&self, path: &RelativePath) -> Result<ObjectMetadata, VaultSyncError> {
        let inner_path = self.encrypt_path(path)?;
        self.inner.head(&inner_path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::filesystem::FilesystemEndpoint;
    use crate::infrastructure::crypto::derive_key;

    fn wrapped(root: &std::path::Path) -> EncryptionEndpoint {
        let key = derive_key("hunter2").unwrap();
        EncryptionEndpoint::new(key, Box::new(FilesystemEndpoint::new(root)))
    }

    #[tokio::test]
    async fn round_trips_a_file_through_the_wrapper() {
        let dir = tempfile::tempdir().unwrap();
        let endpoint = wrapped(dir.path());
        let path = RelativePath::new("test.txt").unwrap();

        endpoint
            .write(&path, cipher::stream_of(b"test data\n".to_vec()), 10)
            .await
            .unwrap();

        assert_eq!(endpoint.size(&path).await.unwrap(), 10);
        let read_back = cipher::collect_stream(endpoint.read(&path).await.unwrap()).await.unwrap();
        assert_eq!(read_back, b"test data\n");
    }

    #[tokio::test]
    async fn list_reports_plaintext_paths_and_sizes() {
        let dir = tempfile::tempdir().unwrap();
        let endpoint = wrapped(dir.path());
        let path = RelativePath::new("prefix1/test.txt").unwrap();
        endpoint.write(&path, cipher::stream_of(b"hello".to_vec()), 5).await.unwrap();

        use futures::StreamExt;
        let entries: Vec<Entry> = endpoint.list().await.unwrap().map(|e| e.unwrap()).collect().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path.as_str(), "prefix1/test.txt");
        assert_eq!(entries[0].size, 5);
    }

    #[tokio::test]
    async fn inner_listing_names_never_contain_a_slash() {
        let dir = tempfile::tempdir().unwrap();
        let endpoint = wrapped(dir.path());
        let path = RelativePath::new("deep/nested/name.txt").unwrap();
        endpoint.write(&path, cipher::stream_of(b"x".to_vec()), 1).await.unwrap();

        let mut inner_names = Vec::new();
        let mut stack = vec![dir.path().to_path_buf()];
        while let Some(dir) = stack.pop() {
            let mut read_dir = tokio::fs::read_dir(&dir).await.unwrap();
            while let Some(child) = read_dir.next_entry().await.unwrap() {
                if child.file_type().await.unwrap().is_dir() {
                    stack.push(child.path());
                } else {
                    inner_names.push(child.file_name().to_string_lossy().to_string());
                }
            }
        }

        assert_eq!(inner_names.len(), 1);
    }

    #[tokio::test]
    async fn is_write_supported_rejects_oversized_writes() {
        let dir = tempfile::tempdir().unwrap();
        let endpoint = wrapped(dir.path());
        let path = RelativePath::new("huge.bin").unwrap();
        assert!(!endpoint.is_write_supported(&path, MAX_ENCRYPTED_WRITE_SIZE + 1));
        assert!(endpoint.is_write_supported(&path, 1024));
    }

    #[tokio::test]
    async fn remove_deletes_through_the_wrapper() {
        let dir = tempfile::tempdir().unwrap();
        let endpoint = wrapped(dir.path());
        let path = RelativePath::new("test.txt").unwrap();
        endpoint.write(&path, cipher::stream_of(b"x".to_vec()), 1).await.unwrap();
        endpoint.remove(&path).await.unwrap();
        assert!(endpoint.size(&path).await.is_err());
    }

    #[tokio::test]
    async fn different_passwords_cannot_read_each_others_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = RelativePath::new("test.txt").unwrap();

        let writer_key = derive_key("hunter2").unwrap();
        let writer = EncryptionEndpoint::new(writer_key, Box::new(FilesystemEndpoint::new(dir.path())));
        writer.write(&path, cipher::stream_of(b"secret".to_vec()), 6).await.unwrap();

        let reader_key = derive_key("a different password").unwrap();
        let reader = EncryptionEndpoint::new(reader_key, Box::new(FilesystemEndpoint::new(dir.path())));
        assert!(reader.size(&path).await.is_err());
    }
}
