//! # Merge
//!
//! Combines records that share an identity key across the permission sets of
//! a group. Grant flags are OR-ed so a permission granted by any member is
//! never lost; other scalars are last-writer-wins.

use indexmap::IndexMap;

use crate::record::PermissionRecord;
use crate::value::AttributeValue;

/// Merge one incoming attribute value into an existing one.
///
/// - Both boolean-like: canonical `true` if either is truthy, else `false`.
/// - Otherwise the incoming value replaces the existing one.
///
/// # Example
///
/// ```
/// use permset_core::{merge_attribute, AttributeValue};
///
/// let merged = merge_attribute(Some(&AttributeValue::Bool(true)), AttributeValue::from("false"));
/// assert_eq!(merged, AttributeValue::Bool(true));
///
/// let merged = merge_attribute(Some(&AttributeValue::from("v1")), AttributeValue::from("v2"));
/// assert_eq!(merged, AttributeValue::from("v2"));
/// ```
pub fn merge_attribute(existing: Option<&AttributeValue>, incoming: AttributeValue) -> AttributeValue {
    match (existing.and_then(AttributeValue::as_bool), incoming.as_bool()) {
        (Some(a), Some(b)) => AttributeValue::Bool(a || b),
        _ => incoming.canonical(),
    }
}

/// Records merged by identity key, in first-seen key order.
///
/// # Example
///
/// ```
/// use permset_core::{MergedPermissions, PermissionRecord, AttributeValue};
///
/// let mut merged = MergedPermissions::new();
/// merged.merge(PermissionRecord::new("A", "Account").with_attribute("allowRead", true));
/// merged.merge(PermissionRecord::new("B", "Account").with_attribute("allowEdit", true));
///
/// let account = merged.get("Account").unwrap();
/// assert_eq!(account.get("allowRead"), Some(&AttributeValue::Bool(true)));
/// assert_eq!(account.get("allowEdit"), Some(&AttributeValue::Bool(true)));
/// assert_eq!(merged.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MergedPermissions {
    records: IndexMap<String, PermissionRecord>,
}

impl MergedPermissions {
    /// Create an empty merge.
    pub fn new() -> Self {
        Self {
            records: IndexMap::new(),
        }
    }

    /// Merge a record into the set.
    ///
    /// The first record seen for a key is kept as the base, including its
    /// origin; later records only contribute attribute values.
    pub fn merge(&mut self, record: PermissionRecord) {
        match self.records.get_mut(&record.key) {
            Some(existing) => {
                for (name, value) in record.attributes {
                    let merged = merge_attribute(existing.attributes.get(&name), value);
                    existing.attributes.insert(name, merged);
                }
            }
            None => {
                self.records.insert(record.key.clone(), record);
            }
        }
    }

    /// Merge several records in order.
    pub fn merge_all<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = PermissionRecord>,
    {
        for record in records {
            self.merge(record);
        }
    }

    /// Look up the merged record for a key.
    pub fn get(&self, key: &str) -> Option<&PermissionRecord> {
        self.records.get(key)
    }

    /// Keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    /// Merged records in first-seen key order.
    pub fn iter(&self) -> impl Iterator<Item = &PermissionRecord> {
        self.records.values()
    }

    /// Get the count of distinct keys.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consume into records, in first-seen key order.
    pub fn into_records(self) -> Vec<PermissionRecord> {
        self.records.into_values().collect()
    }
}

impl FromIterator<PermissionRecord> for MergedPermissions {
    fn from_iter<T: IntoIterator<Item = PermissionRecord>>(iter: T) -> Self {
        let mut merged = MergedPermissions::new();
        merged.merge_all(iter);
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_attribute_or() {
        let t = AttributeValue::Bool(true);
        let f = AttributeValue::Bool(false);

        assert_eq!(merge_attribute(Some(&t), f.clone()), t);
        assert_eq!(merge_attribute(Some(&f), t.clone()), t);
        assert_eq!(merge_attribute(Some(&f), f.clone()), f);
        assert_eq!(merge_attribute(Some(&AttributeValue::from("TRUE")), f.clone()), t);
    }

    #[test]
    fn test_merge_attribute_non_boolean() {
        // Mixed pair is not a boolean comparison; incoming wins
        let merged = merge_attribute(Some(&AttributeValue::from("managed")), AttributeValue::Bool(false));
        assert_eq!(merged, AttributeValue::Bool(false));

        let merged = merge_attribute(Some(&AttributeValue::Bool(true)), AttributeValue::from("n/a"));
        assert_eq!(merged, AttributeValue::from("n/a"));

        // Absent on the existing side: incoming is taken in canonical form
        assert_eq!(merge_attribute(None, AttributeValue::from("true")), AttributeValue::Bool(true));
    }

    #[test]
    fn test_merge_keeps_first_seen_order() {
        let merged: MergedPermissions = vec![
            PermissionRecord::new("A", "Contact"),
            PermissionRecord::new("A", "Account"),
            PermissionRecord::new("B", "Case"),
            PermissionRecord::new("B", "Contact"),
        ]
        .into_iter()
        .collect();

        let keys: Vec<&str> = merged.keys().collect();
        assert_eq!(keys, vec!["Contact", "Account", "Case"]);
    }

    #[test]
    fn test_merge_or_across_sources() {
        let merged: MergedPermissions = vec![
            PermissionRecord::new("A", "Account")
                .with_attribute("allowRead", true)
                .with_attribute("allowEdit", false),
            PermissionRecord::new("B", "Account")
                .with_attribute("allowRead", false)
                .with_attribute("allowEdit", true),
        ]
        .into_iter()
        .collect();

        let account = merged.get("Account").unwrap();
        assert_eq!(account.get("allowRead"), Some(&AttributeValue::Bool(true)));
        assert_eq!(account.get("allowEdit"), Some(&AttributeValue::Bool(true)));
        // Base record keeps its origin
        assert_eq!(account.source(), "A");
    }

    #[test]
    fn test_merge_keeps_attributes_missing_from_later_records() {
        let merged: MergedPermissions = vec![
            PermissionRecord::new("A", "Account").with_attribute("viewAllRecords", true),
            PermissionRecord::new("B", "Account").with_attribute("allowRead", true),
        ]
        .into_iter()
        .collect();

        let account = merged.get("Account").unwrap();
        assert_eq!(account.get("viewAllRecords"), Some(&AttributeValue::Bool(true)));
        assert_eq!(account.get("allowRead"), Some(&AttributeValue::Bool(true)));
    }

    #[test]
    fn test_merge_duplicates_within_one_source() {
        let merged: MergedPermissions = vec![
            PermissionRecord::new("A", "Account").with_attribute("allowDelete", false),
            PermissionRecord::new("A", "Account").with_attribute("allowDelete", true),
        ]
        .into_iter()
        .collect();

        assert_eq!(merged.len(), 1);
        assert_eq!(
            merged.get("Account").unwrap().get("allowDelete"),
            Some(&AttributeValue::Bool(true))
        );
    }
}
