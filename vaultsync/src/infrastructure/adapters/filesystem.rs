// /////////////////////////////////////////////////////////////////////////////
// Vaultsync
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Filesystem Backend (component C)
//!
//! An [`Endpoint`] rooted at a local directory. `list` walks the root
//! depth-first, skipping symlinks and anything that isn't a regular
//! file; `write` creates parent directories before writing. `restore`
//! and `head` are unsupported — a filesystem has no cold tier.

use async_trait::async_trait;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use vaultsync_domain::services::{ByteStream, Endpoint, EntryStream};
use vaultsync_domain::{Entry, RelativePath, VaultSyncError};

/// Chunk size `read`/`write` move through memory at a time, so a sync
/// doesn't have to hold an entire file's bytes at once.
const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// A sync endpoint rooted at a local directory.
pub struct FilesystemEndpoint {
    root: PathBuf,
}

impl FilesystemEndpoint {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn absolute(&self, path: &RelativePath) -> PathBuf {
        self.root.join(path.as_str())
    }
}

/// Recursively walks `dir`, appending every regular file found (symlinks
/// and other non-regular entries are skipped) to `out` as `(absolute
/// path, path relative to root)` pairs.
async fn walk(root: &Path, dir: PathBuf, out: &mut Vec<(PathBuf, String)>) -> Result<(), VaultSyncError> {
    let mut read_dir = tokio::fs::read_dir(&dir).await?;
    while let Some(child) = read_dir.next_entry().await? {
        let file_type = child.file_type().await?;
        let child_path = child.path();
        if file_type.is_symlink() {
            continue;
        } else if file_type.is_dir() {
            Box::pin(walk(root, child_path, out)).await?;
        } else if file_type.is_file() {
            let relative = child_path
                .strip_prefix(root)
                .expect("walked path is always under root")
                .to_string_lossy()
                .replace(std::path::MAIN_SEPARATOR, "/");
            out.push((child_path, relative));
        }
    }
    Ok(())
}

fn system_time_to_millis(time: std::time::SystemTime) -> i64 {
    match time.duration_since(std::time::UNIX_EPOCH) {
        Ok(duration) => duration.as_millis() as i64,
        Err(before_epoch) => -(before_epoch.duration().as_millis() as i64),
    }
}

#[async_trait]
impl Endpoint for FilesystemEndpoint {
    fn name(&self) -> String {
        format!("file://{}", self.root.display())
    }

    async fn list(&self) -> Result<EntryStream, VaultSyncError> {
        let mut files = Vec::new();
        if tokio::fs::try_exists(&self.root).await? {
            walk(&self.root, self.root.clone(), &mut files).await?;
        }

        let mut entries = Vec::with_capacity(files.len());
        for (absolute, relative) in files {
            let metadata = tokio::fs::metadata(&absolute).await?;
            let path = RelativePath::new(relative)?;
            let mtime_ms = system_time_to_millis(metadata.modified()?);
            entries.push(Ok(Entry::new(path, metadata.len(), mtime_ms)));
        }

        Ok(Box::pin(futures::stream::iter(entries)))
    }

    async fn size(&self, path: &RelativePath) -> Result<u64, VaultSyncError> {
        let metadata = tokio::fs::metadata(self.absolute(path)).await?;
        Ok(metadata.len())
    }

    async fn read(&self, path: &RelativePath) -> Result<ByteStream, VaultSyncError> {
        let file = tokio::fs::File::open(self.absolute(path)).await?;
        let stream = futures::stream::unfold(Some(file), |state| async move {
            let mut file = state?;
            let mut buf = vec![0u8; STREAM_CHUNK_SIZE];
            match file.read(&mut buf).await {
                Ok(0) => None,
                Ok(n) => {
                    buf.truncate(n);
                    Some((Ok(buf), Some(file)))
                }
                Err(e) => Some((Err(VaultSyncError::from(e)), None)),
            }
        });
        Ok(Box::pin(stream))
    }

    async fn write(&self, path: &RelativePath, mut stream: ByteStream, _size: u64) -> Result<(), VaultSyncError> {
        let absolute = self.absolute(path);
        if let Some(parent) = absolute.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::File::create(&absolute).await?;
        while let Some(chunk) = stream.next().await {
            file.write_all(&chunk?).await?;
        }
        file.flush().await?;
        Ok(())
    }

    async fn remove(&self, path: &RelativePath) -> Result<(), VaultSyncError> {
        tokio::fs::remove_file(self.absolute(path)).await?;
        Ok(())
    }

    fn is_write_supported(&self, _path: &RelativePath, _size: u64) -> bool {
        true
    }
}
