//! Snapshot file model and loader.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use directory_sdk::{Account, Assignment, GroupId, PolicyId, UserId, UserIdentity};
use serde::Deserialize;
use thiserror::Error;

/// Errors loading a snapshot file.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("cannot read snapshot file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot file {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Complete directory state loaded from a local JSON file.
///
/// Every section is optional; an absent section reads as empty. The
/// assignment list is ground truth in the same shape the real assignment
/// directory returns it: unsorted, possibly duplicated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DirectorySnapshot {
    pub users: Vec<UserIdentity>,

    /// Group memberships, `user_id -> group ids` (one level deep).
    pub memberships: BTreeMap<UserId, BTreeSet<GroupId>>,

    pub accounts: Vec<Account>,

    pub policies: Vec<PolicyId>,

    pub assignments: Vec<Assignment>,

    /// Record set served by the snapshot-backed search port.
    pub records: Vec<serde_json::Value>,

    /// Credentials handed out when an administrative scope is configured.
    pub credentials: Option<SnapshotCredentials>,
}

/// Plaintext credential material of a snapshot file.
///
/// Only ever read from local fixture files; converted to
/// [`directory_sdk::ScopedCredentials`] before leaving the plugin.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnapshotCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
}

impl DirectorySnapshot {
    /// Load and parse a snapshot file.
    ///
    /// # Errors
    ///
    /// - `Io` when the file cannot be read
    /// - `Parse` when its content is not a valid snapshot document
    pub fn from_file(path: &Path) -> Result<Self, SnapshotError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| SnapshotError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_a_complete_snapshot_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "users": [{{"id": "u-1", "user_name": "alice", "display_name": "Alice", "email": "alice@example.com"}}],
                "memberships": {{"u-1": ["g-1"]}},
                "accounts": [{{"id": "111111111111", "display_name": "prod"}}],
                "policies": ["ps-admin"],
                "assignments": [{{
                    "principal_id": "u-1",
                    "principal_type": "USER",
                    "account_id": "111111111111",
                    "policy_id": "ps-admin"
                }}],
                "records": [{{"account_id": "111111111111", "title": "r1"}}]
            }}"#
        )
        .unwrap();

        let snapshot = DirectorySnapshot::from_file(file.path()).unwrap();
        assert_eq!(snapshot.users.len(), 1);
        assert_eq!(snapshot.memberships["u-1"].len(), 1);
        assert_eq!(snapshot.accounts[0].id, "111111111111");
        assert_eq!(snapshot.assignments.len(), 1);
        assert_eq!(snapshot.records.len(), 1);
        assert!(snapshot.credentials.is_none());
    }

    #[test]
    fn absent_sections_read_as_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{}}").unwrap();

        let snapshot = DirectorySnapshot::from_file(file.path()).unwrap();
        assert!(snapshot.users.is_empty());
        assert!(snapshot.assignments.is_empty());
        assert!(snapshot.records.is_empty());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let error = DirectorySnapshot::from_file(Path::new("/nonexistent/snapshot.json"))
            .unwrap_err();
        assert!(matches!(error, SnapshotError::Io { .. }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let error = DirectorySnapshot::from_file(file.path()).unwrap_err();
        assert!(matches!(error, SnapshotError::Parse { .. }));
    }
}
