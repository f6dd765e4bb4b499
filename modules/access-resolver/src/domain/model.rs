//! Derived models of the resolution run.
//!
//! Everything here is aggregated from fresh directory snapshots and
//! discarded at the end of the run; there is no persisted store.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use directory_sdk::{AccountId, Assignment, GroupId, PrincipalType, UserId, UserIdentity};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// De-duplicated set of account ids a user may access.
///
/// Order-independent; multiplicity (several policies or groups reaching the
/// same account) is discarded. Empty means "no access", not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessibilitySet(BTreeSet<AccountId>);

impl AccessibilitySet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, account_id: &str) -> bool {
        self.0.contains(account_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccountId> {
        self.0.iter()
    }

    /// Absorb every account id of `accounts`.
    pub fn extend_from(&mut self, accounts: &BTreeSet<AccountId>) {
        self.0.extend(accounts.iter().cloned());
    }
}

impl FromIterator<AccountId> for AccessibilitySet {
    fn from_iter<I: IntoIterator<Item = AccountId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a AccessibilitySet {
    type Item = &'a AccountId;
    type IntoIter = std::collections::btree_set::Iter<'a, AccountId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The complete assignment relation for the organization, plus the number of
/// (account, policy) pairs skipped due to recovered lookup failures.
#[derive(Debug, Clone, Default)]
pub struct AssignmentRelation {
    pub assignments: Vec<Assignment>,
    pub skipped_pairs: usize,
}

/// Key of the principal index: a principal is a user or a group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrincipalKey {
    pub id: String,
    pub principal_type: PrincipalType,
}

impl PrincipalKey {
    #[must_use]
    pub fn user(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            principal_type: PrincipalType::User,
        }
    }

    #[must_use]
    pub fn group(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            principal_type: PrincipalType::Group,
        }
    }
}

/// Index from principal to the accounts it is assigned to.
///
/// Derived once from the full assignment relation so the per-user lookup is
/// amortized instead of re-enumerating the relation per user.
#[derive(Debug, Default)]
pub struct PrincipalIndex {
    accounts_by_principal: HashMap<PrincipalKey, BTreeSet<AccountId>>,
}

impl PrincipalIndex {
    #[must_use]
    pub fn from_relation(relation: &AssignmentRelation) -> Self {
        let mut accounts_by_principal: HashMap<PrincipalKey, BTreeSet<AccountId>> = HashMap::new();
        for assignment in &relation.assignments {
            accounts_by_principal
                .entry(PrincipalKey {
                    id: assignment.principal_id.clone(),
                    principal_type: assignment.principal_type,
                })
                .or_default()
                .insert(assignment.account_id.clone());
        }
        Self {
            accounts_by_principal,
        }
    }

    #[must_use]
    pub fn accounts_of(&self, principal: &PrincipalKey) -> Option<&BTreeSet<AccountId>> {
        self.accounts_by_principal.get(principal)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts_by_principal.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts_by_principal.is_empty()
    }
}

/// Group memberships per user, plus the number of users whose membership
/// lookup failed and was recovered as "no memberships".
#[derive(Debug, Default)]
pub struct MembershipMap {
    pub groups_by_user: HashMap<UserId, BTreeSet<GroupId>>,
    pub failed_lookups: usize,
}

impl MembershipMap {
    #[must_use]
    pub fn groups_of(&self, user_id: &str) -> Option<&BTreeSet<GroupId>> {
        self.groups_by_user.get(user_id)
    }
}

/// One user's resolved access, with the identity attributes downstream
/// consumers need. The attributes are attached for convenience and are not
/// part of the access-control contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccess {
    pub user_id: UserId,
    pub user_name: String,
    pub display_name: String,
    #[serde(default)]
    pub email: String,
    pub accounts: AccessibilitySet,
}

impl UserAccess {
    #[must_use]
    pub fn new(identity: &UserIdentity, accounts: AccessibilitySet) -> Self {
        Self {
            user_id: identity.id.clone(),
            user_name: identity.user_name.clone(),
            display_name: identity.display_name.clone(),
            email: identity.email.clone(),
            accounts,
        }
    }
}

/// The exposed resolution report: every user's accessibility set plus the
/// recovered-failure counts of the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessReport {
    pub users: BTreeMap<UserId, UserAccess>,
    pub skipped_pairs: usize,
    pub failed_membership_lookups: usize,
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
}

impl AccessReport {
    #[must_use]
    pub fn user(&self, user_id: &str) -> Option<&UserAccess> {
        self.users.get(user_id)
    }
}
