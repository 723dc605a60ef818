// /////////////////////////////////////////////////////////////////////////////
// Vaultsync
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Application layer: the differ, the sync/restore drivers, and the
//! small collaborators (`secrets`, `uri`) that turn CLI input into a
//! running sync.

pub mod differ;
pub mod restore_driver;
pub mod secrets;
pub mod sync_driver;
pub mod uri;

pub use differ::diff;
pub use restore_driver::{run_restore, RestoreStats};
pub use secrets::Secrets;
pub use sync_driver::{run_sync, SyncStats};
pub use uri::build_endpoint;
