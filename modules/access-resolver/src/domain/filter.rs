//! Per-identity record filter.

use directory_sdk::AccountId;
use serde_json::Value;

use super::model::AccessibilitySet;

/// Pure predicate filter over an arbitrary record sequence.
///
/// Records are raw JSON objects carrying a resource-identifying field
/// (`account_id` by default). Filtering preserves order, synthesizes
/// nothing, and silently drops unmatched records; absence of access is the
/// expected common case, not an error.
#[derive(Debug, Clone)]
pub struct RecordFilter {
    set: Option<AccessibilitySet>,
    field: String,
}

impl RecordFilter {
    /// Filter scoped to one identity's accessibility set.
    #[must_use]
    pub fn scoped(set: AccessibilitySet, field: impl Into<String>) -> Self {
        Self {
            set: Some(set),
            field: field.into(),
        }
    }

    /// Filter scoped to an explicit account-id allowlist, used to pre-scope
    /// a run without re-deriving the set from policy assignments.
    #[must_use]
    pub fn from_allowlist<I>(account_ids: I, field: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = AccountId>,
    {
        Self::scoped(account_ids.into_iter().collect(), field)
    }

    /// Administrative/full run: every record passes unmodified, including
    /// records with no resource field.
    #[must_use]
    pub fn unrestricted(field: impl Into<String>) -> Self {
        Self {
            set: None,
            field: field.into(),
        }
    }

    /// Whether a record passes the filter.
    ///
    /// With a scope active, a record missing the resource field (or carrying
    /// a non-string value there) belongs to no account and is excluded.
    #[must_use]
    pub fn matches(&self, record: &Value) -> bool {
        match &self.set {
            None => true,
            Some(set) => record
                .get(&self.field)
                .and_then(Value::as_str)
                .is_some_and(|account_id| set.contains(account_id)),
        }
    }

    /// Apply the filter, keeping the matching subsequence in stable order.
    #[must_use]
    pub fn apply(&self, records: Vec<Value>) -> Vec<Value> {
        records
            .into_iter()
            .filter(|record| self.matches(record))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn scoped_to(account_ids: &[&str]) -> RecordFilter {
        RecordFilter::from_allowlist(
            account_ids.iter().map(|id| (*id).to_owned()),
            "account_id",
        )
    }

    #[test]
    fn keeps_only_records_in_the_accessibility_set() {
        let filter = scoped_to(&["111111111111"]);
        let records = vec![
            json!({"account_id": "111111111111", "v": 1}),
            json!({"account_id": "222222222222", "v": 2}),
        ];

        let filtered = filter.apply(records);
        assert_eq!(filtered, vec![json!({"account_id": "111111111111", "v": 1})]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let filter = scoped_to(&["111111111111", "333333333333"]);
        let records = vec![
            json!({"account_id": "333333333333"}),
            json!({"account_id": "111111111111"}),
            json!({"account_id": "444444444444"}),
        ];

        let once = filter.apply(records);
        let twice = filter.apply(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn preserves_record_order() {
        let filter = scoped_to(&["111111111111", "222222222222"]);
        let records = vec![
            json!({"account_id": "222222222222", "n": 1}),
            json!({"account_id": "111111111111", "n": 2}),
            json!({"account_id": "222222222222", "n": 3}),
        ];

        let filtered = filter.apply(records);
        let order: Vec<i64> = filtered
            .iter()
            .map(|r| r.get("n").and_then(Value::as_i64).unwrap())
            .collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn unlabeled_record_is_dropped_when_scoped() {
        let filter = scoped_to(&["111111111111"]);
        let records = vec![
            json!({"v": "no account field"}),
            json!({"account_id": 42, "v": "non-string account field"}),
            json!({"account_id": "111111111111"}),
        ];

        let filtered = filter.apply(records);
        assert_eq!(filtered, vec![json!({"account_id": "111111111111"})]);
    }

    #[test]
    fn unrestricted_filter_passes_everything_through() {
        let filter = RecordFilter::unrestricted("account_id");
        let records = vec![
            json!({"v": "no account field"}),
            json!({"account_id": "222222222222"}),
        ];

        let filtered = filter.apply(records.clone());
        assert_eq!(filtered, records);
    }

    #[test]
    fn empty_set_drops_every_labeled_record() {
        let filter = RecordFilter::scoped(AccessibilitySet::new(), "account_id");
        let records = vec![json!({"account_id": "111111111111"})];
        assert!(filter.apply(records).is_empty());
    }
}
