// /////////////////////////////////////////////////////////////////////////////
// Vaultsync
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Object-Store Backend (component D)
//!
//! An [`Endpoint`] backed by an object-store bucket and key prefix.
//! `list` follows continuation tokens to exhaustion; `write` always goes
//! through a managed multipart upload sized per [`compute_part_size`];
//! `restore`/`head` expose the cold-tier retrieval workflow §4.D and
//! §4.G describe.

use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::primitives::ByteStream as S3ByteStream;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart, GlacierJobParameters, RestoreRequest, StorageClass, Tier};
use aws_sdk_s3::Client;
use futures::StreamExt;
use vaultsync_domain::services::{ByteStream, Endpoint, EntryStream};
use vaultsync_domain::{Entry, ObjectMetadata, RelativePath, VaultSyncError};

/// Object-store credentials parsed out of the secrets file (§6).
#[derive(Debug, Clone)]
pub struct ObjectStoreCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
    pub region: String,
}

/// Builds an S3 client from explicit credentials — no reliance on the
/// ambient AWS credential chain, since §6's secrets file is the only
/// credential source the external contract names.
pub async fn build_client(credentials: &ObjectStoreCredentials) -> Client {
    let creds = Credentials::new(
        credentials.access_key_id.clone(),
        credentials.secret_access_key.clone(),
        credentials.session_token.clone(),
        None,
        "vaultsync-secrets",
    );
    let config = aws_sdk_s3::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(credentials.region.clone()))
        .credentials_provider(creds)
        .build();
    Client::from_conf(config)
}

/// Minimum part size: 5 MiB.
pub const MIN_PART_SIZE: u64 = 5 * 1024 * 1024;
/// Maximum part size: 5 GiB.
pub const MAX_PART_SIZE: u64 = 5 * 1024 * 1024 * 1024;
/// Maximum parts per multipart upload.
pub const MAX_PARTS: u64 = 10_000;
/// Maximum single-object size: 5 TiB.
pub const MAX_OBJECT_SIZE: u64 = 5 * 1024 * 1024 * 1024 * 1024;

fn ceil_div(numerator: u64, denominator: u64) -> u64 {
    numerator.div_ceil(denominator)
}

/// §4.D's part-sizing algorithm: start at 5 MiB, double while the part
/// count would exceed 10 000, then clip to the [5 MiB, 5 GiB] range.
/// Every doubling or clip is logged, matching the "Increasing part size
/// to …" scenario in §8.
pub fn compute_part_size(total_size: u64) -> u64 {
    let mut part_size = MIN_PART_SIZE;
    while total_size > 0 && ceil_div(total_size, part_size) > MAX_PARTS {
        part_size *= 2;
        tracing::info!("Increasing part size to {part_size} bytes");
    }
    if part_size > MAX_PART_SIZE {
        tracing::info!("Clipping part size down to {MAX_PART_SIZE} bytes");
        part_size = MAX_PART_SIZE;
    }
    if part_size < MIN_PART_SIZE {
        tracing::info!("Clipping part size up to {MIN_PART_SIZE} bytes");
        part_size = MIN_PART_SIZE;
    }
    part_size
}

/// Parses a `--restore-request` JSON literal into the typed request body
/// the SDK expects. Only the fields §4.D/§6 document (`Days`,
/// `GlacierJobParameters.Tier`) are interpreted; the rest of the object
/// is treated as opaque configuration, per the glossary.
fn parse_restore_request(json: &str) -> Result<RestoreRequest, VaultSyncError> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| VaultSyncError::configuration(format!("invalid restore-request JSON: {e}")))?;

    let days = value.get("Days").and_then(serde_json::Value::as_i64).unwrap_or(5) as i32;

    let tier = value
        .get("GlacierJobParameters")
        .and_then(|v| v.get("Tier"))
        .and_then(serde_json::Value::as_str)
        .unwrap_or("Bulk");

    let glacier_job_parameters = GlacierJobParameters::builder()
        .tier(Tier::from(tier))
        .build()
        .map_err(|e| VaultSyncError::configuration(format!("invalid restore-request: {e}")))?;

    Ok(RestoreRequest::builder()
        .days(days)
        .glacier_job_parameters(glacier_job_parameters)
        .build())
}

fn millis_from_aws_datetime(time: Option<&aws_smithy_types::DateTime>) -> i64 {
    time.and_then(|t| t.to_millis().ok()).unwrap_or(0)
}

/// A sync endpoint backed by one object-store bucket and key prefix.
pub struct ObjectStoreEndpoint {
    client: Client,
    bucket: String,
    prefix: String,
    storage_class: String,
    restore_request: String,
}

impl ObjectStoreEndpoint {
    pub fn new(client: Client, bucket: String, prefix: String, storage_class: String, restore_request: String) -> Self {
        Self {
            client,
            bucket,
            prefix,
            storage_class,
            restore_request,
        }
    }

    fn key_for(&self, path: &RelativePath) -> String {
        if self.prefix.is_empty() {
            path.as_str().to_string()
        } else {
            format!("{}/{}", self.prefix.trim_end_matches('/'), path.as_str())
        }
    }

    fn path_for(&self, key: &str) -> Result<RelativePath, VaultSyncError> {
        let stripped = key.strip_prefix(self.prefix.trim_end_matches('/')).unwrap_or(key);
        RelativePath::new(stripped.trim_start_matches('/'))
    }
}

#[async_trait]
impl Endpoint for ObjectStoreEndpoint {
    fn name(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.prefix)
    }

    async fn list(&self) -> Result<EntryStream, VaultSyncError> {
        let mut entries = Vec::new();
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(&self.prefix)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| VaultSyncError::io(format!("list_objects_v2 failed: {e}")))?;
            for object in page.contents() {
                let Some(key) = object.key() else { continue };
                let path = self.path_for(key)?;
                let size = object.size().unwrap_or(0).max(0) as u64;
                let mtime_ms = millis_from_aws_datetime(object.last_modified());
                entries.push(Ok(Entry::new(path, size, mtime_ms)));
            }
        }

        Ok(Box::pin(futures::stream::iter(entries)))
    }

    async fn size(&self, path: &RelativePath) -> Result<u64, VaultSyncError> {
        let metadata = self.head(path).await?;
        Ok(metadata.size)
    }

    async fn read(&self, path: &RelativePath) -> Result<ByteStream, VaultSyncError> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(self.key_for(path))
            .send()
            .await
            .map_err(|e| VaultSyncError::io(format!("get_object failed for {path}: {e}")))?;

        let path_display = path.to_string();
        let stream = futures::stream::unfold(Some(output.body), move |state| {
            let path_display = path_display.clone();
            async move {
                let mut body = state?;
                match body.next().await {
                    Some(Ok(bytes)) => Some((Ok(bytes.to_vec()), Some(body))),
                    Some(Err(e)) => Some((Err(VaultSyncError::io(format!("reading object body failed for {path_display}: {e}"))), None)),
                    None => None,
                }
            }
        });

        Ok(Box::pin(stream))
    }

    async fn write(&self, path: &RelativePath, mut stream: ByteStream, size: u64) -> Result<(), VaultSyncError> {
        let key = self.key_for(path);
        let part_size = compute_part_size(size);
        let storage_class = StorageClass::from(self.storage_class.as_str());

        let create = self
            .client
            .create_multipart_upload()
            .bucket(&self.bucket)
            .key(&key)
            .storage_class(storage_class)
            .send()
            .await
            .map_err(|e| VaultSyncError::io(format!("create_multipart_upload failed for {path}: {e}")))?;

        let upload_id = create
            .upload_id()
            .ok_or_else(|| VaultSyncError::io("create_multipart_upload did not return an upload id"))?
            .to_string();

        let result = self.upload_parts_from_stream(&key, &upload_id, &mut stream, part_size).await;

        match result {
            Ok(completed_parts) => {
                self.client
                    .complete_multipart_upload()
                    .bucket(&self.bucket)
                    .key(&key)
                    .upload_id(&upload_id)
                    .multipart_upload(CompletedMultipartUpload::builder().set_parts(Some(completed_parts)).build())
                    .send()
                    .await
                    .map_err(|e| VaultSyncError::io(format!("complete_multipart_upload failed for {path}: {e}")))?;
                Ok(())
            }
            Err(err) => {
                let _ = self
                    .client
                    .abort_multipart_upload()
                    .bucket(&self.bucket)
                    .key(&key)
                    .upload_id(&upload_id)
                    .send()
                    .await;
                Err(err)
            }
        }
    }

    async fn remove(&self, path: &RelativePath) -> Result<(), VaultSyncError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(self.key_for(path))
            .send()
            .await
            .map_err(|e| VaultSyncError::io(format!("delete_object failed for {path}: {e}")))?;
        Ok(())
    }

    fn is_write_supported(&self, _path: &RelativePath, size: u64) -> bool {
        size <= MAX_OBJECT_SIZE
    }

    async fn restore(&self, path: &RelativePath) -> Result<(), VaultSyncError> {
        let restore_request = parse_restore_request(&self.restore_request)?;
        self.client
            .restore_object()
            .bucket(&self.bucket)
            .key(self.key_for(path))
            .restore_request(restore_request)
            .send()
            .await
            .map_err(|e| VaultSyncError::io(format!("restore_object failed for {path}: {e}")))?;
        Ok(())
    }

    async fn head(&self, path: &RelativePath) -> Result<ObjectMetadata, VaultSyncError> {
        let output = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(self.key_for(path))
            .send()
            .await
            .map_err(|e| VaultSyncError::io(format!("head_object failed for {path}: {e}")))?;

        Ok(ObjectMetadata {
            size: output.content_length().unwrap_or(0).max(0) as u64,
            mtime_ms: millis_from_aws_datetime(output.last_modified()),
            storage_class: output.storage_class().map(|sc| sc.as_str().to_string()),
            restore_header: output.restore().map(str::to_string),
        })
    }
}

impl ObjectStoreEndpoint {
    /// Drains `stream` into `part_size`-sized parts as chunks arrive,
    /// rather than buffering the whole body first — a part is uploaded
    /// as soon as enough bytes have accumulated, so memory use tracks
    /// `part_size` plus one source chunk, not the object's total size.
    /// Returns the completed-part descriptors `complete_multipart_upload`
    /// needs. Part numbers are 1-based per the S3 API.
    async fn upload_parts_from_stream(
        &self,
        key: &str,
        upload_id: &str,
        stream: &mut ByteStream,
        part_size: u64,
    ) -> Result<Vec<CompletedPart>, VaultSyncError> {
        let part_size = part_size as usize;
        let mut parts = Vec::new();
        let mut buffer: Vec<u8> = Vec::new();
        let mut part_number = 1i32;

        loop {
            match stream.next().await.transpose()? {
                Some(chunk) => buffer.extend_from_slice(&chunk),
                None => {
                    // A zero-byte object still needs exactly one (empty) part.
                    if !buffer.is_empty() || part_number == 1 {
                        let uploaded = self.upload_one_part(key, upload_id, part_number, std::mem::take(&mut buffer)).await?;
                        parts.push(uploaded);
                    }
                    break;
                }
            }

            while buffer.len() >= part_size {
                let tail = buffer.split_off(part_size);
                let filled = std::mem::replace(&mut buffer, tail);
                let uploaded = self.upload_one_part(key, upload_id, part_number, filled).await?;
                parts.push(uploaded);
                part_number += 1;
            }
        }

        Ok(parts)
    }

    async fn upload_one_part(&self, key: &str, upload_id: &str, part_number: i32, bytes: Vec<u8>) -> Result<CompletedPart, VaultSyncError> {
        let uploaded = self
            .client
            .upload_part()
            .bucket(&self.bucket)
            .key(key)
            .upload_id(upload_id)
            .part_number(part_number)
            .body(S3ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| VaultSyncError::io(format!("upload_part failed for part {part_number}: {e}")))?;

        let e_tag = uploaded.e_tag().unwrap_or_default().to_string();
        Ok(CompletedPart::builder().part_number(part_number).e_tag(e_tag).build())
    }
}
