//! Group membership resolver: one lookup per user, fail-soft.

use std::sync::Arc;

use directory_sdk::{DirectoryError, IdentityDirectoryClient, UserIdentity};
use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::GroupNesting;

use super::model::MembershipMap;

/// Expand every user into its set of group memberships, one lookup per
/// nesting mode.
///
/// Queried once per user, not once per (user, account, policy), so the
/// assignment fan-out stays the dominant cost. A failed lookup is logged,
/// counted, and treated as "no memberships" for that user; it never aborts
/// resolution for the other users.
#[tracing::instrument(skip_all, fields(users = users.len(), nesting = ?nesting))]
pub async fn resolve_memberships(
    client: &Arc<dyn IdentityDirectoryClient>,
    users: &[UserIdentity],
    nesting: GroupNesting,
    concurrency: usize,
    cancel: &CancellationToken,
) -> MembershipMap {
    let mut map = MembershipMap::default();

    let mut lookups = futures::stream::iter(users)
        .map(|user| {
            let client = Arc::clone(client);
            let user_id = user.id.clone();
            async move {
                let listed = match nesting {
                    // One level deep: a user's groups, never the groups of
                    // those groups.
                    GroupNesting::Direct => client.list_groups_of_user(&user_id).await,
                };
                (user_id, listed)
            }
        })
        .buffer_unordered(concurrency.max(1));

    loop {
        let next = tokio::select! {
            () = cancel.cancelled() => {
                debug!("Cancelled, keeping the memberships resolved so far");
                break;
            }
            next = lookups.next() => next,
        };

        match next {
            None => break,
            Some((user_id, Ok(groups))) => {
                map.groups_by_user.insert(user_id, groups);
            }
            // Unknown user: same as zero memberships.
            Some((_, Err(DirectoryError::NotFound(_)))) => {}
            Some((user_id, Err(error))) => {
                warn!(
                    user_id = %user_id,
                    error = %error,
                    "Membership lookup failed, treating as no memberships"
                );
                map.failed_lookups += 1;
            }
        }
    }

    debug!(
        resolved = map.groups_by_user.len(),
        failed_lookups = map.failed_lookups,
        "Group memberships resolved"
    );
    map
}
