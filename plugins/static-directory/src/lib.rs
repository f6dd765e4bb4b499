//! Static Directory Plugin
//!
//! Serves every directory-sdk port from a local JSON snapshot file: users,
//! memberships, accounts, permission sets, assignments, search records, and
//! optional scoped credentials. Intended for local runs, fixtures, and tests
//! where the real directories are out of reach.
//!
//! ## Configuration
//!
//! ```yaml
//! directory:
//!   snapshot: "fixtures/directory.json"
//!   role_ref: "ReportAdministrationAccess"   # optional
//! ```

pub mod config;
pub mod domain;
pub mod snapshot;

pub use config::StaticDirectoryConfig;
pub use domain::SnapshotDirectory;
pub use snapshot::{DirectorySnapshot, SnapshotError};
