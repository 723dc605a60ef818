// /////////////////////////////////////////////////////////////////////////////
// Vaultsync
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Restore Driver (component G, restore command)
//!
//! Walks an object-store endpoint's listing and issues `restore(path)`
//! for every entry §4.G's rule says is archived and not already being
//! retrieved. Idempotent by construction: [`ObjectMetadata::needs_restore`]
//! already encodes "an ongoing retrieval is a no-op", so this driver
//! never needs to track restore state itself.

use vaultsync_domain::services::Endpoint;
use vaultsync_domain::VaultSyncError;

/// Tally of how many entries the restore driver requested retrieval for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreStats {
    pub requested: u64,
    pub already_in_progress: u64,
}

/// Runs a restore pass over `target`'s full listing.
pub async fn run_restore(target: &dyn Endpoint) -> Result<RestoreStats, VaultSyncError> {
    use futures::StreamExt;

    tracing::info!("Restoring archived objects under {}", target.name());
    let mut stats = RestoreStats::default();

    let entries: Vec<_> = target.list().await?.collect().await;
    for entry in entries {
        let entry = entry?;
        let metadata = target.head(&entry.path).await?;

        if metadata.needs_restore() {
            tracing::info!("Requesting restore for {}", entry.path);
            target.restore(&entry.path).await?;
            stats.requested += 1;
        } else {
            tracing::debug!("Restore already in progress for {}", entry.path);
            stats.already_in_progress += 1;
        }
    }

    tracing::info!(
        "restore requested for {} object(s), {} already in progress",
        stats.requested,
        stats.already_in_progress
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use vaultsync_domain::services::{ByteStream, EntryStream};
    use vaultsync_domain::{Entry, ObjectMetadata, RelativePath};

    struct FakeArchive {
        entries: Vec<Entry>,
        restore_headers: std::collections::HashMap<String, Option<String>>,
        restored: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Endpoint for FakeArchive {
        fn name(&self) -> String {
            "s3://fake-bucket/".to_string()
        }

        async fn list(&self) -> Result<EntryStream, VaultSyncError> {
            let entries = self.entries.clone().into_iter().map(Ok);
            Ok(Box::pin(futures::stream::iter(entries)))
        }

        async fn size(&self, _path: &RelativePath) -> Result<u64, VaultSyncError> {
            unimplemented!()
        }

        async fn read(&self, _path: &RelativePath) -> Result<ByteStream, VaultSyncError> {
            unimplemented!()
        }

        async fn write(&self, _path: &RelativePath, _stream: ByteStream, _size: u64) -> Result<(), VaultSyncError> {
            unimplemented!()
        }

        async fn remove(&self, _path: &RelativePath) -> Result<(), VaultSyncError> {
            unimplemented!()
        }

        fn is_write_supported(&self, _path: &RelativePath, _size: u64) -> bool {
            true
        }

        async fn restore(&self, path: &RelativePath) -> Result<(), VaultSyncError> {
            self.restored.lock().unwrap().push(path.as_str().to_string());
            Ok(())
        }

        async fn head(&self, path: &RelativePath) -> Result<ObjectMetadata, VaultSyncError> {
            Ok(ObjectMetadata {
                size: 100,
                mtime_ms: 0,
                storage_class: Some("DEEP_ARCHIVE".to_string()),
                restore_header: self.restore_headers.get(path.as_str()).cloned().flatten(),
            })
        }
    }

    #[tokio::test]
    async fn requests_restore_for_archived_objects_without_a_restore_header() {
        let archive = FakeArchive {
            entries: vec![Entry::new(RelativePath::new("a.txt").unwrap(), 100, 0)],
            restore_headers: std::collections::HashMap::new(),
            restored: Mutex::new(Vec::new()),
        };

        let stats = run_restore(&archive).await.unwrap();
        assert_eq!(stats.requested, 1);
        assert_eq!(archive.restored.lock().unwrap().as_slice(), ["a.txt"]);
    }

    #[tokio::test]
    async fn skips_objects_with_an_ongoing_restore() {
        let mut headers = std::collections::HashMap::new();
        headers.insert("a.txt".to_string(), Some("ongoing-request=\"true\"".to_string()));

        let archive = FakeArchive {
            entries: vec![Entry::new(RelativePath::new("a.txt").unwrap(), 100, 0)],
            restore_headers: headers,
            restored: Mutex::new(Vec::new()),
        };

        let stats = run_restore(&archive).await.unwrap();
        assert_eq!(stats.requested, 0);
        assert_eq!(stats.already_in_progress, 1);
        assert!(archive.restored.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn requests_restore_again_once_a_prior_retrieval_completed() {
        let mut headers = std::collections::HashMap::new();
        headers.insert("a.txt".to_string(), Some("ongoing-request=\"false\", expiry-date=\"...\"".to_string()));

        let archive = FakeArchive {
            entries: vec![Entry::new(RelativePath::new("a.txt").unwrap(), 100, 0)],
            restore_headers: headers,
            restored: Mutex::new(Vec::new()),
        };

        let stats = run_restore(&archive).await.unwrap();
        assert_eq!(stats.requested, 1);
    }
}
