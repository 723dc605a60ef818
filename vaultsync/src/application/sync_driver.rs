// /////////////////////////////////////////////////////////////////////////////
// Vaultsync
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Sync Driver (component G)
//!
//! Consumes the differ's action stream and dispatches each action to the
//! source/target endpoint pair. Single-threaded, strictly sequential per
//! §5: one action's write completes before the next action starts, which
//! is just what `.await`ing each dispatch in a `for` loop gives for free.

use vaultsync_domain::services::Endpoint;
use vaultsync_domain::{Action, VaultSyncError};

use crate::application::differ::diff;

/// Action-by-action tallies, printed as the sync's final summary line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub added: u64,
    pub updated: u64,
    pub deleted: u64,
    pub skipped: u64,
}

impl SyncStats {
    /// The single human-readable summary line §6/§7 require on success.
    pub fn summary_line(&self) -> String {
        format!(
            "{} file(s) added, {} file(s) updated, {} file(s) deleted, {} file(s) skipped",
            self.added, self.updated, self.deleted, self.skipped
        )
    }
}

/// Runs a full sync: lists both endpoints, diffs the listings, and
/// applies each action against `target`. Returns the action tallies on
/// success; any I/O or integrity error aborts the whole sync per §7.
pub async fn run_sync(source: &dyn Endpoint, target: &dyn Endpoint) -> Result<SyncStats, VaultSyncError> {
    tracing::info!("Syncing {} -> {}", source.name(), target.name());

    let source_entries = collect_entries(source).await?;
    let target_entries = collect_entries(target).await?;

    let actions = diff(source_entries, target_entries);
    let mut stats = SyncStats::default();

    for action in actions {
        let is_update = matches!(action, Action::Update(_));
        match action {
            Action::Add(entry) | Action::Update(entry) => {
                let size = source.size(&entry.path).await?;

                if !target.is_write_supported(&entry.path, size) {
                    tracing::info!("Skipping {} (unsupported by {})", entry.path, target.name());
                    stats.skipped += 1;
                    continue;
                }

                tracing::info!("Copying {}", entry.path);
                let stream = source.read(&entry.path).await?;
                target.write(&entry.path, stream, size).await?;

                if is_update {
                    stats.updated += 1;
                } else {
                    stats.added += 1;
                }
            }
            Action::Delete(entry) => {
                tracing::info!("Removing {}", entry.path);
                target.remove(&entry.path).await?;
                stats.deleted += 1;
            }
        }
    }

    tracing::info!("{}", stats.summary_line());
    Ok(stats)
}

async fn collect_entries(endpoint: &dyn Endpoint) -> Result<Vec<vaultsync_domain::Entry>, VaultSyncError> {
    use futures::StreamExt;
    endpoint.list().await?.collect::<Vec<_>>().await.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::FilesystemEndpoint;
    use crate::infrastructure::crypto::cipher;
    use vaultsync_domain::RelativePath;

    #[tokio::test]
    async fn adds_a_new_file() {
        let source_dir = tempfile::tempdir().unwrap();
        let target_dir = tempfile::tempdir().unwrap();
        let source = FilesystemEndpoint::new(source_dir.path());
        let target = FilesystemEndpoint::new(target_dir.path());

        let path = RelativePath::new("test.txt").unwrap();
        source.write(&path, cipher::stream_of(b"test data\n".to_vec()), 10).await.unwrap();

        let stats = run_sync(&source, &target).await.unwrap();
        assert_eq!(stats, SyncStats { added: 1, ..Default::default() });
        assert!(target_dir.path().join("test.txt").exists());
    }

    #[tokio::test]
    async fn updates_a_changed_file() {
        let source_dir = tempfile::tempdir().unwrap();
        let target_dir = tempfile::tempdir().unwrap();
        let source = FilesystemEndpoint::new(source_dir.path());
        let target = FilesystemEndpoint::new(target_dir.path());

        let path = RelativePath::new("test.txt").unwrap();
        target.write(&path, cipher::stream_of(b"test data\n".to_vec()), 10).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        source.write(&path, cipher::stream_of(b"test data\ntest data".to_vec()), 19).await.unwrap();

        let stats = run_sync(&source, &target).await.unwrap();
        assert_eq!(stats, SyncStats { updated: 1, ..Default::default() });
    }

    #[tokio::test]
    async fn removes_a_deleted_file() {
        let source_dir = tempfile::tempdir().unwrap();
        let target_dir = tempfile::tempdir().unwrap();
        let source = FilesystemEndpoint::new(source_dir.path());
        let target = FilesystemEndpoint::new(target_dir.path());

        let path = RelativePath::new("test.txt").unwrap();
        target.write(&path, cipher::stream_of(b"test data\n".to_vec()), 10).await.unwrap();

        let stats = run_sync(&source, &target).await.unwrap();
        assert_eq!(stats, SyncStats { deleted: 1, ..Default::default() });
        assert!(!target_dir.path().join("test.txt").exists());
    }

    #[tokio::test]
    async fn a_second_sync_is_idempotent() {
        let source_dir = tempfile::tempdir().unwrap();
        let target_dir = tempfile::tempdir().unwrap();
        let source = FilesystemEndpoint::new(source_dir.path());
        let target = FilesystemEndpoint::new(target_dir.path());

        let path = RelativePath::new("test.txt").unwrap();
        source.write(&path, cipher::stream_of(b"test data\n".to_vec()), 10).await.unwrap();

        run_sync(&source, &target).await.unwrap();
        let second = run_sync(&source, &target).await.unwrap();
        assert_eq!(second, SyncStats::default());
    }

    #[tokio::test]
    async fn multiple_files_are_all_added() {
        let source_dir = tempfile::tempdir().unwrap();
        let target_dir = tempfile::tempdir().unwrap();
        let source = FilesystemEndpoint::new(source_dir.path());
        let target = FilesystemEndpoint::new(target_dir.path());

        for relative in ["test.txt", "prefix1/test.txt", "prefix2/test.txt"] {
            let path = RelativePath::new(relative).unwrap();
            source.write(&path, cipher::stream_of(b"x".to_vec()), 1).await.unwrap();
        }

        let stats = run_sync(&source, &target).await.unwrap();
        assert_eq!(stats, SyncStats { added: 3, ..Default::default() });
    }

    #[tokio::test]
    async fn oversized_write_is_skipped_not_failed() {
        struct RejectingEndpoint(FilesystemEndpoint);

        #[async_trait::async_trait]
        impl Endpoint for RejectingEndpoint {
            fn name(&self) -> String {
                self.0.name()
            }
            async fn list(&self) -> Result<vaultsync_domain::services::EntryStream, VaultSyncError> {
                self.0.list().await
            }
            async fn size(&self, path: &RelativePath) -> Result<u64, VaultSyncError> {
                self.0.size(path).await
            }
            async fn read(&self, path: &RelativePath) -> Result<vaultsync_domain::services::ByteStream, VaultSyncError> {
                self.0.read(path).await
            }
            async fn write(
                &self,
                path: &RelativePath,
                stream: vaultsync_domain::services::ByteStream,
                size: u64,
            ) -> Result<(), VaultSyncError> {
                self.0.write(path, stream, size).await
            }
            async fn remove(&self, path: &RelativePath) -> Result<(), VaultSyncError> {
                self.0.remove(path).await
            }
            fn is_write_supported(&self, _path: &RelativePath, _size: u64) -> bool {
                false
            }
        }

        let source_dir = tempfile::tempdir().unwrap();
        let target_dir = tempfile::tempdir().unwrap();
        let source = FilesystemEndpoint::new(source_dir.path());
        let target = RejectingEndpoint(FilesystemEndpoint::new(target_dir.path()));

        let path = RelativePath::new("huge.bin").unwrap();
        source.write(&path, cipher::stream_of(b"x".to_vec()), 1).await.unwrap();

        let stats = run_sync(&source, &target).await.unwrap();
        assert_eq!(stats, SyncStats { skipped: 1, ..Default::default() });
    }
}
