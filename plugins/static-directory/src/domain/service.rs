//! Snapshot-backed directory service.

use std::collections::BTreeSet;

use directory_sdk::{Assignment, GroupId};
use tracing::debug;

use crate::config::StaticDirectoryConfig;
use crate::snapshot::{DirectorySnapshot, SnapshotError};

/// Serves every directory port from one loaded [`DirectorySnapshot`].
///
/// Lookups never fail: an unknown `(account, policy)` pair or an unknown
/// user simply yields an empty listing, matching the upstream directories
/// where "not found" and "no data" are the same observation.
pub struct SnapshotDirectory {
    snapshot: DirectorySnapshot,
    role_ref: Option<String>,
}

impl SnapshotDirectory {
    #[must_use]
    pub fn new(snapshot: DirectorySnapshot) -> Self {
        Self {
            snapshot,
            role_ref: None,
        }
    }

    /// Load the snapshot named by the configuration.
    ///
    /// # Errors
    ///
    /// Propagates [`SnapshotError`] when the snapshot file cannot be loaded.
    pub fn from_config(config: &StaticDirectoryConfig) -> Result<Self, SnapshotError> {
        let snapshot = DirectorySnapshot::from_file(&config.snapshot)?;
        debug!(
            path = %config.snapshot.display(),
            users = snapshot.users.len(),
            accounts = snapshot.accounts.len(),
            assignments = snapshot.assignments.len(),
            "Directory snapshot loaded"
        );
        Ok(Self {
            snapshot,
            role_ref: config.role_ref.clone(),
        })
    }

    #[must_use]
    pub fn with_role_ref(mut self, role_ref: impl Into<String>) -> Self {
        self.role_ref = Some(role_ref.into());
        self
    }

    pub(crate) fn snapshot(&self) -> &DirectorySnapshot {
        &self.snapshot
    }

    pub(crate) fn role_ref(&self) -> Option<&str> {
        self.role_ref.as_deref()
    }

    /// Assignments of one policy on one account; empty for unknown pairs.
    pub(crate) fn assignments_for(&self, account_id: &str, policy_id: &str) -> Vec<Assignment> {
        self.snapshot
            .assignments
            .iter()
            .filter(|a| a.account_id == account_id && a.policy_id == policy_id)
            .cloned()
            .collect()
    }

    /// Direct group memberships of one user; empty for unknown users.
    pub(crate) fn groups_of(&self, user_id: &str) -> BTreeSet<GroupId> {
        self.snapshot
            .memberships
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Case-insensitive substring match over the serialized record; an empty
    /// query matches every record.
    pub(crate) fn record_matches(record: &serde_json::Value, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        record
            .to_string()
            .to_lowercase()
            .contains(&query.to_lowercase())
    }
}
