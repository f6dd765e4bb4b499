//! Configuration for the access resolution engine.

use directory_sdk::AccountId;
use serde::Deserialize;

/// Configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccessResolverConfig {
    /// Concurrency cap for the (account × policy) assignment fan-out.
    pub assignment_concurrency: usize,

    /// Concurrency cap for per-user group membership lookups.
    pub membership_concurrency: usize,

    /// Group membership expansion depth.
    pub group_nesting: GroupNesting,

    /// Name of the resource-identifying field on downstream records.
    pub record_account_field: String,

    /// Explicit account allowlist that pre-scopes record filtering without
    /// re-deriving the set from policy assignments.
    pub allowed_accounts: Option<Vec<AccountId>>,
}

impl Default for AccessResolverConfig {
    fn default() -> Self {
        Self {
            assignment_concurrency: 8,
            membership_concurrency: 8,
            group_nesting: GroupNesting::Direct,
            record_account_field: "account_id".to_owned(),
            allowed_accounts: None,
        }
    }
}

/// How far group membership is expanded when widening the access relation.
///
/// The source directory does not clarify whether nested groups should be
/// resolved transitively, so only one-level expansion is defined. New
/// variants can be added here without breaking existing configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum GroupNesting {
    /// Expand each user into its direct group memberships only.
    #[default]
    Direct,
}
