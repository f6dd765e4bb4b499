//! Client ports for the external directories.
//!
//! All ports are read-only. Implementations are registered at startup and
//! consumed as `Arc<dyn _>`; the resolver never constructs one itself.

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::error::DirectoryError;
use crate::models::{Account, Assignment, GroupId, PolicyId, UserIdentity};

/// Identity directory: users and their group memberships.
#[async_trait]
pub trait IdentityDirectoryClient: Send + Sync {
    /// List every user in the identity store.
    ///
    /// # Errors
    ///
    /// Fails when the identity store cannot be listed; this aborts the run.
    async fn list_users(&self) -> Result<Vec<UserIdentity>, DirectoryError>;

    /// List the groups a user belongs to (one level deep).
    ///
    /// Queried once per user per run. Callers fail soft to an empty set on
    /// error.
    ///
    /// # Errors
    ///
    /// - `NotFound` when the user is unknown (treated as no memberships)
    /// - `Unavailable` on transient lookup failure
    async fn list_groups_of_user(&self, user_id: &str) -> Result<BTreeSet<GroupId>, DirectoryError>;
}

/// Organization directory: the accounts access is partitioned over.
#[async_trait]
pub trait OrganizationDirectoryClient: Send + Sync {
    /// List every account in the organization.
    ///
    /// # Errors
    ///
    /// Fails when the organization cannot be listed; this aborts the run.
    async fn list_accounts(&self) -> Result<Vec<Account>, DirectoryError>;
}

/// Assignment directory: permission sets and per-account-per-policy
/// assignment listings.
///
/// The directory does not support a single call enumerating all assignments,
/// only per-account-per-policy listing; the resolver fans out over the full
/// cross product.
#[async_trait]
pub trait AssignmentDirectoryClient: Send + Sync {
    /// List every permission set.
    ///
    /// # Errors
    ///
    /// Fails when the permission sets cannot be listed; this aborts the run.
    async fn list_policies(&self) -> Result<Vec<PolicyId>, DirectoryError>;

    /// List the assignments of one policy on one account.
    ///
    /// Callers treat `NotFound` as "no assignments" and fail soft on any
    /// other error.
    ///
    /// # Errors
    ///
    /// - `NotFound` when the pair is unknown or access to it was lost
    /// - `Unavailable` on transient lookup failure
    async fn list_assignments(
        &self,
        account_id: &str,
        policy_id: &str,
    ) -> Result<Vec<Assignment>, DirectoryError>;
}

/// Downstream record source subject to per-identity filtering.
///
/// Records are raw JSON objects; the resolver only inspects the configured
/// resource-identifying field.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Run a query and return at most `size_limit` records.
    ///
    /// # Errors
    ///
    /// Surfaced to the caller of this specific data request; does not affect
    /// resolution of other identities.
    async fn search(
        &self,
        query: &str,
        size_limit: usize,
    ) -> Result<Vec<serde_json::Value>, DirectoryError>;
}
