//! Access graph builder: the (account × policy) assignment fan-out.

use std::sync::Arc;

use directory_sdk::{Account, AssignmentDirectoryClient, DirectoryError, PolicyId};
use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::model::AssignmentRelation;

/// Build the complete assignment relation by querying every
/// (account, policy) pair.
///
/// The upstream directory only supports per-account-per-policy listing, so
/// the relation is assembled from an O(|accounts| × |policies|) fan-out,
/// bounded by `concurrency`. Results merge into an order-independent
/// relation, so no ordering guarantee is required among the lookups.
///
/// Failure policy: `NotFound` is indistinguishable from "no assignments"
/// and contributes nothing; any other per-pair failure is logged, counted in
/// `skipped_pairs`, and never aborts enumeration of the remaining pairs.
#[tracing::instrument(skip_all, fields(accounts = accounts.len(), policies = policies.len()))]
pub async fn build_relation(
    client: &Arc<dyn AssignmentDirectoryClient>,
    accounts: &[Account],
    policies: &[PolicyId],
    concurrency: usize,
    cancel: &CancellationToken,
) -> AssignmentRelation {
    let mut relation = AssignmentRelation::default();
    if accounts.is_empty() || policies.is_empty() {
        debug!("Empty account or policy set, nothing to enumerate");
        return relation;
    }

    let pairs = accounts.iter().flat_map(|account| {
        policies
            .iter()
            .map(move |policy| (account.id.clone(), policy.clone()))
    });

    let mut lookups = futures::stream::iter(pairs)
        .map(|(account_id, policy_id)| {
            let client = Arc::clone(client);
            async move {
                let listed = client.list_assignments(&account_id, &policy_id).await;
                (account_id, policy_id, listed)
            }
        })
        .buffer_unordered(concurrency.max(1));

    loop {
        let next = tokio::select! {
            () = cancel.cancelled() => {
                debug!("Cancelled, keeping the assignments merged so far");
                break;
            }
            next = lookups.next() => next,
        };

        match next {
            None => break,
            Some((_, _, Ok(assignments))) => relation.assignments.extend(assignments),
            // Lost access or unknown pair: same as "no assignments".
            Some((_, _, Err(DirectoryError::NotFound(_)))) => {}
            Some((account_id, policy_id, Err(error))) => {
                warn!(
                    account_id = %account_id,
                    policy_id = %policy_id,
                    error = %error,
                    "Assignment lookup failed, skipping pair"
                );
                relation.skipped_pairs += 1;
            }
        }
    }

    debug!(
        assignments = relation.assignments.len(),
        skipped_pairs = relation.skipped_pairs,
        "Assignment relation built"
    );
    relation
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use directory_sdk::{Assignment, PrincipalType};

    use super::*;

    struct PairClient {
        responses: HashMap<(String, String), Result<Vec<Assignment>, DirectoryError>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AssignmentDirectoryClient for PairClient {
        async fn list_policies(&self) -> Result<Vec<PolicyId>, DirectoryError> {
            unreachable!("not used by the graph builder")
        }

        async fn list_assignments(
            &self,
            account_id: &str,
            policy_id: &str,
        ) -> Result<Vec<Assignment>, DirectoryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self
                .responses
                .get(&(account_id.to_owned(), policy_id.to_owned()))
            {
                Some(Ok(assignments)) => Ok(assignments.clone()),
                Some(Err(DirectoryError::Unavailable(reason))) => {
                    Err(DirectoryError::unavailable(reason.clone()))
                }
                Some(Err(_)) | None => Err(DirectoryError::not_found("pair")),
            }
        }
    }

    fn account(id: &str) -> Account {
        Account {
            id: id.to_owned(),
            display_name: format!("account {id}"),
        }
    }

    fn user_assignment(account_id: &str) -> Assignment {
        Assignment {
            principal_id: "u-1".to_owned(),
            principal_type: PrincipalType::User,
            account_id: account_id.to_owned(),
            policy_id: "ps-1".to_owned(),
        }
    }

    #[tokio::test]
    async fn failed_pair_does_not_abort_enumeration() {
        let mut responses = HashMap::new();
        responses.insert(
            ("111111111111".to_owned(), "ps-1".to_owned()),
            Ok(vec![user_assignment("111111111111")]),
        );
        responses.insert(
            ("999999999999".to_owned(), "ps-1".to_owned()),
            Err(DirectoryError::unavailable("throttled")),
        );
        let client: Arc<dyn AssignmentDirectoryClient> = Arc::new(PairClient {
            responses,
            calls: AtomicUsize::new(0),
        });

        let relation = build_relation(
            &client,
            &[account("111111111111"), account("999999999999")],
            &["ps-1".to_owned()],
            4,
            &CancellationToken::new(),
        )
        .await;

        assert_eq!(relation.assignments.len(), 1);
        assert_eq!(relation.assignments[0].account_id, "111111111111");
        assert_eq!(relation.skipped_pairs, 1);
    }

    #[tokio::test]
    async fn not_found_is_no_assignments_not_a_skip() {
        let client: Arc<dyn AssignmentDirectoryClient> = Arc::new(PairClient {
            responses: HashMap::new(),
            calls: AtomicUsize::new(0),
        });

        let relation = build_relation(
            &client,
            &[account("111111111111")],
            &["ps-1".to_owned()],
            4,
            &CancellationToken::new(),
        )
        .await;

        assert!(relation.assignments.is_empty());
        assert_eq!(relation.skipped_pairs, 0);
    }

    #[tokio::test]
    async fn empty_policy_set_issues_no_lookups() {
        let client = Arc::new(PairClient {
            responses: HashMap::new(),
            calls: AtomicUsize::new(0),
        });
        let as_port: Arc<dyn AssignmentDirectoryClient> = client.clone();

        let relation = build_relation(
            &as_port,
            &[account("111111111111")],
            &[],
            4,
            &CancellationToken::new(),
        )
        .await;

        assert!(relation.assignments.is_empty());
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn cancelled_token_stops_issuing_lookups() {
        let client = Arc::new(PairClient {
            responses: HashMap::new(),
            calls: AtomicUsize::new(0),
        });
        let as_port: Arc<dyn AssignmentDirectoryClient> = client.clone();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let relation = build_relation(
            &as_port,
            &[account("111111111111"), account("222222222222")],
            &["ps-1".to_owned()],
            1,
            &cancel,
        )
        .await;

        assert!(relation.assignments.is_empty());
        assert_eq!(relation.skipped_pairs, 0);
    }
}
