// /////////////////////////////////////////////////////////////////////////////
// Vaultsync
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Object-store metadata returned by `Endpoint::head`, and the restore-state
//! rule the restore driver evaluates against it.

/// Metadata for a single object, as returned by `head(path)`.
///
/// `restore_header` carries the raw value of the object store's `Restore`
/// response header/field when present (e.g. `ongoing-request="true"`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectMetadata {
    pub size: u64,
    pub mtime_ms: i64,
    pub storage_class: Option<String>,
    pub restore_header: Option<String>,
}

/// Storage classes that place an object in a cold archive tier, where a
/// `restore` call is needed before the body becomes readable.
const ARCHIVE_STORAGE_CLASSES: &[&str] = &["GLACIER", "DEEP_ARCHIVE"];

impl ObjectMetadata {
    /// Whether `storage_class` names an archive-tier class (§4.G).
    /// `STANDARD` and other non-archive classes are always readable
    /// without a restore.
    pub fn is_archived(&self) -> bool {
        self.storage_class.as_deref().is_some_and(|class| ARCHIVE_STORAGE_CLASSES.contains(&class))
    }

    /// Whether the restore driver should issue `restore(path)` for this
    /// object: it must be archived, *and* the `Restore` header must be
    /// absent or report `ongoing-request="false"` (a completed
    /// retrieval, re-requestable).
    ///
    /// A header reporting `ongoing-request="true"` means a restore is
    /// already in flight, so this returns `false` — the driver is
    /// idempotent by construction rather than by tracking state itself.
    /// A non-archived object never needs restoring, regardless of the
    /// header.
    pub fn needs_restore(&self) -> bool {
        if !self.is_archived() {
            return false;
        }
        match &self.restore_header {
            None => true,
            Some(header) => header.contains("ongoing-request=\"false\""),
        }
    }
}
