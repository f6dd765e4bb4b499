//! Accessibility resolver service.

use std::collections::BTreeMap;
use std::sync::Arc;

use directory_sdk::{
    AssignmentDirectoryClient, IdentityDirectoryClient, OrganizationDirectoryClient,
};
use time::OffsetDateTime;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::config::AccessResolverConfig;

use super::error::DomainError;
use super::model::{AccessReport, AccessibilitySet, PrincipalIndex, PrincipalKey, UserAccess};
use super::{graph, membership};

/// Access resolution service.
///
/// Holds the three directory ports and computes, for every user, the
/// de-duplicated set of accounts reachable directly or through any group
/// membership, across every permission set.
pub struct Service {
    identities: Arc<dyn IdentityDirectoryClient>,
    organization: Arc<dyn OrganizationDirectoryClient>,
    assignments: Arc<dyn AssignmentDirectoryClient>,
    config: AccessResolverConfig,
}

impl Service {
    #[must_use]
    pub fn new(
        identities: Arc<dyn IdentityDirectoryClient>,
        organization: Arc<dyn OrganizationDirectoryClient>,
        assignments: Arc<dyn AssignmentDirectoryClient>,
        config: AccessResolverConfig,
    ) -> Self {
        Self {
            identities,
            organization,
            assignments,
            config,
        }
    }

    /// Run a full resolution: fresh directory snapshots in, access report out.
    ///
    /// The report is deterministic given a fixed snapshot of users,
    /// memberships, and assignments. Cancellation yields a report over
    /// whatever was merged before the token fired.
    ///
    /// # Errors
    ///
    /// Fails only when one of the directory-level listings (users, accounts,
    /// permission sets) fails; per-pair and per-user lookup failures are
    /// recovered and reported through the run counters.
    #[instrument(skip_all)]
    pub async fn resolve(&self, cancel: &CancellationToken) -> Result<AccessReport, DomainError> {
        let users = self.identities.list_users().await?;
        let accounts = self.organization.list_accounts().await?;
        let policies = self.assignments.list_policies().await?;
        info!(
            users = users.len(),
            accounts = accounts.len(),
            policies = policies.len(),
            "Directory snapshots loaded"
        );

        let relation = graph::build_relation(
            &self.assignments,
            &accounts,
            &policies,
            self.config.assignment_concurrency,
            cancel,
        )
        .await;

        let memberships = membership::resolve_memberships(
            &self.identities,
            &users,
            self.config.group_nesting,
            self.config.membership_concurrency,
            cancel,
        )
        .await;

        let index = PrincipalIndex::from_relation(&relation);

        let mut resolved = BTreeMap::new();
        for user in &users {
            let mut accessible = AccessibilitySet::new();

            if let Some(direct) = index.accounts_of(&PrincipalKey::user(&user.id)) {
                accessible.extend_from(direct);
            }
            if let Some(groups) = memberships.groups_of(&user.id) {
                for group_id in groups {
                    if let Some(inherited) = index.accounts_of(&PrincipalKey::group(group_id)) {
                        accessible.extend_from(inherited);
                    }
                }
            }

            info!(
                user_id = %user.id,
                user_name = %user.user_name,
                accessible_accounts = accessible.len(),
                "Resolved accessibility set"
            );
            resolved.insert(user.id.clone(), UserAccess::new(user, accessible));
        }

        Ok(AccessReport {
            users: resolved,
            skipped_pairs: relation.skipped_pairs,
            failed_membership_lookups: memberships.failed_lookups,
            generated_at: OffsetDateTime::now_utc(),
        })
    }
}
