// /////////////////////////////////////////////////////////////////////////////
// Vaultsync
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Secrets File
//!
//! The `--secrets` JSON document from §6: a single flat object carrying
//! whichever of `password`/`accessKeyId`/`secretAccessKey`/
//! `sessionToken`/`region` the endpoints in play actually need. Unknown
//! fields are ignored (no `deny_unknown_fields`); missing fields are
//! only an error once a concrete endpoint asks for one it needs.

use serde::Deserialize;
use vaultsync_domain::VaultSyncError;

use crate::infrastructure::adapters::ObjectStoreCredentials;

/// The parsed contents of a `--secrets` file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    pub password: Option<String>,
    #[serde(rename = "accessKeyId")]
    pub access_key_id: Option<String>,
    #[serde(rename = "secretAccessKey")]
    pub secret_access_key: Option<String>,
    #[serde(rename = "sessionToken")]
    pub session_token: Option<String>,
    pub region: Option<String>,
}

impl Secrets {
    /// Loads and parses a secrets file. A missing `path` (no `--secrets`
    /// given) is not a configuration error here — that's only fatal
    /// once an endpoint that needs one of these fields is constructed.
    pub fn load(path: Option<&str>) -> Result<Self, VaultSyncError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let contents = std::fs::read_to_string(path)
            .map_err(|e| VaultSyncError::configuration(format!("failed to read secrets file {path}: {e}")))?;
        serde_json::from_str(&contents)
            .map_err(|e| VaultSyncError::configuration(format!("invalid secrets JSON in {path}: {e}")))
    }

    /// The password an `enc+` endpoint needs for key derivation.
    pub fn require_password(&self) -> Result<&str, VaultSyncError> {
        self.password
            .as_deref()
            .ok_or_else(|| VaultSyncError::configuration("secrets file is missing the 'password' field required by an enc+ endpoint"))
    }

    /// The credential bundle an object-store endpoint needs.
    pub fn require_object_store_credentials(&self) -> Result<ObjectStoreCredentials, VaultSyncError> {
        let missing = |field: &str| VaultSyncError::configuration(format!("secrets file is missing the '{field}' field required by an s3 endpoint"));

        Ok(ObjectStoreCredentials {
            access_key_id: self.access_key_id.clone().ok_or_else(|| missing("accessKeyId"))?,
            secret_access_key: self.secret_access_key.clone().ok_or_else(|| missing("secretAccessKey"))?,
            session_token: self.session_token.clone(),
            region: self.region.clone().ok_or_else(|| missing("region"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn absent_path_yields_empty_secrets() {
        let secrets = Secrets::load(None).unwrap();
        assert!(secrets.password.is_none());
    }

    #[test]
    fn parses_all_documented_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"password":"hunter2","accessKeyId":"AKIA","secretAccessKey":"secret","sessionToken":"token","region":"us-east-1"}}"#
        )
        .unwrap();

        let secrets = Secrets::load(file.path().to_str()).unwrap();
        assert_eq!(secrets.password.as_deref(), Some("hunter2"));
        assert_eq!(secrets.region.as_deref(), Some("us-east-1"));
    }

    #[test]
    fn ignores_unknown_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"password":"hunter2","somethingElse":"ignored"}}"#).unwrap();
        let secrets = Secrets::load(file.path().to_str()).unwrap();
        assert_eq!(secrets.password.as_deref(), Some("hunter2"));
    }

    #[test]
    fn missing_password_is_a_configuration_error() {
        let secrets = Secrets::default();
        let err = secrets.require_password().unwrap_err();
        assert!(err.is_usage());
    }

    #[test]
    fn missing_credentials_field_is_a_configuration_error() {
        let secrets = Secrets {
            access_key_id: Some("AKIA".to_string()),
            ..Default::default()
        };
        assert!(secrets.require_object_store_credentials().is_err());
    }

    #[test]
    fn unreadable_file_is_a_configuration_error() {
        let err = Secrets::load(Some("/does/not/exist.json")).unwrap_err();
        assert!(err.is_usage());
    }
}
