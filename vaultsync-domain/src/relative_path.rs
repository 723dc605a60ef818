// /////////////////////////////////////////////////////////////////////////////
// Vaultsync
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! A validated, `/`-separated relative path as used by every endpoint.

use crate::error::VaultSyncError;
use std::fmt;

/// A path relative to an endpoint's root.
///
/// Always uses `/` as a separator, is never absolute, never contains a
/// `..` segment, and never ends with `/`. Endpoints that wrap another
/// (the encryption layer) pass `RelativePath` values through untouched;
/// only the inner key/filename representation changes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelativePath(String);

impl RelativePath {
    /// Validates and wraps a path string.
    pub fn new(path: impl Into<String>) -> Result<Self, VaultSyncError> {
        let path = path.into();
        if path.is_empty() {
            return Err(VaultSyncError::invalid_path("path must not be empty"));
        }
        if path.starts_with('/') {
            return Err(VaultSyncError::invalid_path(format!("path must not be absolute: {path}")));
        }
        if path.ends_with('/') {
            return Err(VaultSyncError::invalid_path(format!("path must not end with '/': {path}")));
        }
        if path.split('/').any(|segment| segment == "..") {
            return Err(VaultSyncError::invalid_path(format!("path must not contain '..': {path}")));
        }
        Ok(Self(path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RelativePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}


/// The sort-merge differ's correctness depends on `RelativePath`'s `Ord`
/// being total, transitive, and deterministic across repeated
/// comparisons — properties checked here over arbitrary valid path
/// strings rather than the handful of fixed pairs above.
#[cfg(test)]
mod ord_properties {
    use super::*;
    use proptest::prelude::*;

    fn valid_path() -> impl Strategy<Value = String> {
        "[a-z]{1,6}(/[a-z]{1,6}){0,3}"
    }

    proptest! {
        #[test]
        fn comparison_is_deterministic_across_repeated_calls(a in valid_path(), b in valid_path()) {
            let p1 = RelativePath::new(a).unwrap();
            let p2 = RelativePath::new(b).unwrap();
            prop_assert_eq!(p1.cmp(&p2), p1.cmp(&p2));
        }

        #[test]
        fn ordering_is_antisymmetric(a in valid_path(), b in valid_path()) {
            let p1 = RelativePath::new(a).unwrap();
            let p2 = RelativePath::new(b).unwrap();
            if p1 < p2 {
                prop_assert!(p2 > p1);
            }
        }

        #[test]
        fn ordering_is_transitive(a in valid_path(), b in valid_path(), c in valid_path()) {
            let p1 = RelativePath::new(a).unwrap();
            let p2 = RelativePath::new(b).unwrap();
            let p3 = RelativePath::new(c).unwrap();
            if p1 < p2 && p2 < p3 {
                prop_assert!(p1 < p3);
            }
        }
    }
}
