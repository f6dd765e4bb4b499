//! Directory port implementations for the snapshot-backed service.

use std::collections::BTreeSet;

use async_trait::async_trait;
use directory_sdk::{
    Account, Assignment, AssignmentDirectoryClient, CredentialsProvider, DirectoryError, GroupId,
    IdentityDirectoryClient, OrganizationDirectoryClient, PolicyId, ScopedCredentials,
    SearchClient, UserIdentity,
};
use secrecy::SecretString;

use super::service::SnapshotDirectory;

#[async_trait]
impl IdentityDirectoryClient for SnapshotDirectory {
    async fn list_users(&self) -> Result<Vec<UserIdentity>, DirectoryError> {
        Ok(self.snapshot().users.clone())
    }

    async fn list_groups_of_user(
        &self,
        user_id: &str,
    ) -> Result<BTreeSet<GroupId>, DirectoryError> {
        Ok(self.groups_of(user_id))
    }
}

#[async_trait]
impl OrganizationDirectoryClient for SnapshotDirectory {
    async fn list_accounts(&self) -> Result<Vec<Account>, DirectoryError> {
        Ok(self.snapshot().accounts.clone())
    }
}

#[async_trait]
impl AssignmentDirectoryClient for SnapshotDirectory {
    async fn list_policies(&self) -> Result<Vec<PolicyId>, DirectoryError> {
        Ok(self.snapshot().policies.clone())
    }

    async fn list_assignments(
        &self,
        account_id: &str,
        policy_id: &str,
    ) -> Result<Vec<Assignment>, DirectoryError> {
        Ok(self.assignments_for(account_id, policy_id))
    }
}

#[async_trait]
impl SearchClient for SnapshotDirectory {
    async fn search(
        &self,
        query: &str,
        size_limit: usize,
    ) -> Result<Vec<serde_json::Value>, DirectoryError> {
        Ok(self
            .snapshot()
            .records
            .iter()
            .filter(|record| Self::record_matches(record, query))
            .take(size_limit)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CredentialsProvider for SnapshotDirectory {
    async fn scoped_credentials(&self) -> Result<Option<ScopedCredentials>, DirectoryError> {
        let Some(role_ref) = self.role_ref() else {
            return Ok(None);
        };
        let credentials = self.snapshot().credentials.as_ref().ok_or_else(|| {
            DirectoryError::credential_exchange(format!(
                "snapshot carries no credentials for role {role_ref}"
            ))
        })?;
        Ok(Some(ScopedCredentials {
            access_key_id: credentials.access_key_id.clone(),
            secret_access_key: SecretString::from(credentials.secret_access_key.clone()),
            session_token: SecretString::from(credentials.session_token.clone()),
        }))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::snapshot::{DirectorySnapshot, SnapshotCredentials};
    use directory_sdk::PrincipalType;

    fn snapshot() -> DirectorySnapshot {
        let mut snapshot = DirectorySnapshot::default();
        snapshot.users.push(UserIdentity {
            id: "u-1".to_owned(),
            user_name: "alice".to_owned(),
            display_name: "Alice".to_owned(),
            email: "alice@example.com".to_owned(),
        });
        snapshot
            .memberships
            .insert("u-1".to_owned(), ["g-1".to_owned()].into());
        snapshot.accounts.push(Account {
            id: "111111111111".to_owned(),
            display_name: "prod".to_owned(),
        });
        snapshot.policies.push("ps-admin".to_owned());
        snapshot.assignments.push(Assignment {
            principal_id: "u-1".to_owned(),
            principal_type: PrincipalType::User,
            account_id: "111111111111".to_owned(),
            policy_id: "ps-admin".to_owned(),
        });
        snapshot.assignments.push(Assignment {
            principal_id: "g-1".to_owned(),
            principal_type: PrincipalType::Group,
            account_id: "111111111111".to_owned(),
            policy_id: "ps-readonly".to_owned(),
        });
        snapshot.records = vec![
            serde_json::json!({"account_id": "111111111111", "title": "Billing report"}),
            serde_json::json!({"account_id": "222222222222", "title": "Audit report"}),
            serde_json::json!({"title": "Unlabeled note"}),
        ];
        snapshot
    }

    #[tokio::test]
    async fn assignments_are_scoped_to_the_requested_pair() {
        let directory = SnapshotDirectory::new(snapshot());

        let listed = directory
            .list_assignments("111111111111", "ps-admin")
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].principal_id, "u-1");
    }

    #[tokio::test]
    async fn unknown_pair_yields_an_empty_listing() {
        let directory = SnapshotDirectory::new(snapshot());

        let listed = directory
            .list_assignments("999999999999", "ps-admin")
            .await
            .unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn unknown_user_has_no_memberships() {
        let directory = SnapshotDirectory::new(snapshot());

        assert_eq!(directory.list_groups_of_user("u-1").await.unwrap().len(), 1);
        assert!(directory
            .list_groups_of_user("u-missing")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn search_matches_substrings_case_insensitively() {
        let directory = SnapshotDirectory::new(snapshot());

        let hits = directory.search("billing", 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0]["title"], "Billing report");
    }

    #[tokio::test]
    async fn search_honors_the_size_limit() {
        let directory = SnapshotDirectory::new(snapshot());

        assert_eq!(directory.search("", 10).await.unwrap().len(), 3);
        assert_eq!(directory.search("", 2).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn ambient_scope_yields_no_credentials() {
        let directory = SnapshotDirectory::new(snapshot());

        assert!(directory.scoped_credentials().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn role_ref_returns_the_snapshot_credentials() {
        let mut data = snapshot();
        data.credentials = Some(SnapshotCredentials {
            access_key_id: "AKIA123".to_owned(),
            secret_access_key: "s3cr3t".to_owned(),
            session_token: "t0k3n".to_owned(),
        });
        let directory = SnapshotDirectory::new(data).with_role_ref("ReportAdministrationAccess");

        let credentials = directory.scoped_credentials().await.unwrap().unwrap();
        assert_eq!(credentials.access_key_id, "AKIA123");
    }

    #[tokio::test]
    async fn role_ref_without_snapshot_credentials_is_fatal() {
        let directory = SnapshotDirectory::new(snapshot()).with_role_ref("ReportAdministrationAccess");

        let error = directory.scoped_credentials().await.unwrap_err();
        assert!(matches!(error, DirectoryError::CredentialExchange(_)));
        assert!(!error.is_recoverable());
    }
}
