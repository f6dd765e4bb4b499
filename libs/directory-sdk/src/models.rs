//! Domain models shared by every directory client.
//!
//! Identifiers are opaque stable strings as issued by the source
//! directories (12-digit account IDs, `ps-…` permission-set names, UUID-ish
//! user and group IDs). The resolver never parses them.

use serde::{Deserialize, Serialize};

/// Opaque user identifier.
pub type UserId = String;

/// Opaque group identifier.
pub type GroupId = String;

/// Opaque account (resource partition) identifier.
pub type AccountId = String;

/// Opaque permission-set identifier.
///
/// A policy carries no internal structure here; it is only a dimension over
/// which assignments are enumerated.
pub type PolicyId = String;

/// The kind of principal an assignment is granted to.
///
/// Serialized as `USER` / `GROUP` to match the upstream wire convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrincipalType {
    User,
    Group,
}

/// A user as listed by the identity directory.
///
/// Immutable snapshot for one resolution run; sourced fresh each run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Opaque stable identifier.
    pub id: UserId,
    /// Login name.
    pub user_name: String,
    /// Display name; the directory falls back to `user_name` when unset.
    pub display_name: String,
    /// Primary email; may be empty.
    #[serde(default)]
    pub email: String,
}

/// An account (resource partition) as listed by the organization directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Opaque stable identifier; all downstream filtering keys off this.
    pub id: AccountId,
    /// Human-readable name.
    pub display_name: String,
}

/// A grant of one policy to one principal on one account.
///
/// Assignments are ground truth: not guaranteed sorted, not guaranteed
/// unique, and possibly absent due to transient lookup failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    pub principal_id: String,
    pub principal_type: PrincipalType,
    pub account_id: AccountId,
    pub policy_id: PolicyId,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn principal_type_uses_upstream_wire_names() {
        let user = serde_json::to_string(&PrincipalType::User).unwrap();
        let group = serde_json::to_string(&PrincipalType::Group).unwrap();
        assert_eq!(user, "\"USER\"");
        assert_eq!(group, "\"GROUP\"");
    }

    #[test]
    fn assignment_round_trips() {
        let assignment = Assignment {
            principal_id: "u-1".to_owned(),
            principal_type: PrincipalType::User,
            account_id: "111111111111".to_owned(),
            policy_id: "ps-admin".to_owned(),
        };
        let json = serde_json::to_string(&assignment).unwrap();
        let back: Assignment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, assignment);
    }
}
