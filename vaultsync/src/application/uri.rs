// /////////////////////////////////////////////////////////////////////////////
// Vaultsync
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # URI Parsing and Endpoint Construction
//!
//! §6's grammar — `[enc+](file|s3)://<path>` — parsed into a concrete
//! [`Endpoint`] stack. This is one of the "external collaborators" §1
//! scopes outside the core design, but a runnable binary still needs it
//! wired up, so it gets its own small module rather than living inline
//! in `main`.

use vaultsync_domain::services::Endpoint;
use vaultsync_domain::VaultSyncError;

use crate::application::secrets::Secrets;
use crate::infrastructure::adapters::object_store::{build_client, ObjectStoreEndpoint};
use crate::infrastructure::adapters::{EncryptionEndpoint, FilesystemEndpoint};
use crate::infrastructure::crypto::derive_key;

/// Builds the `Endpoint` a URI from §6's grammar describes, wiring in
/// secrets as each scheme requires them.
///
/// `storage_class` and `restore_request` only apply to `s3://` endpoints
/// and are ignored for `file://`.
pub async fn build_endpoint(
    uri: &str,
    secrets: &Secrets,
    storage_class: &str,
    restore_request: &str,
) -> Result<Box<dyn Endpoint>, VaultSyncError> {
    let (encrypted, rest) = match uri.strip_prefix("enc+") {
        Some(rest) => (true, rest),
        None => (false, uri),
    };

    let leaf: Box<dyn Endpoint> = if let Some(root) = rest.strip_prefix("file://") {
        Box::new(FilesystemEndpoint::new(root))
    } else if let Some(path) = rest.strip_prefix("s3://") {
        let (bucket, prefix) = match path.split_once('/') {
            Some((bucket, prefix)) => (bucket, prefix),
            None => (path, ""),
        };
        if bucket.is_empty() {
            return Err(VaultSyncError::usage(format!("{uri} is missing a bucket name")));
        }
        let credentials = secrets.require_object_store_credentials()?;
        let client = build_client(&credentials).await;
        Box::new(ObjectStoreEndpoint::new(
            client,
            bucket.to_string(),
            prefix.to_string(),
            storage_class.to_string(),
            restore_request.to_string(),
        ))
    } else {
        return Err(VaultSyncError::usage(format!("{uri} has an unrecognized scheme (expected file:// or s3://)")));
    };

    if encrypted {
        let password = secrets.require_password()?;
        let key = derive_key(password)?;
        Ok(Box::new(EncryptionEndpoint::new(key, leaf)))
    } else {
        Ok(leaf)
    }
}
