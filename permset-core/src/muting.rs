//! # Muting
//!
//! A permission set group can name muting permission sets. Their entries are
//! applied after the member sets are merged: every attribute a muting entry
//! mentions is forced to that entry's boolean value, whatever the merge
//! produced. Attributes it does not mention are left alone.
//!
//! A muting entry may name an attribute its merged record never had, so
//! resolved records do not always share one attribute set. Writers that need
//! a single header take the union from [`Resolution::columns`] and leave the
//! missing cells blank.
//!
//! [`Resolution::columns`]: crate::aggregate::Resolution::columns

use std::collections::HashMap;

use crate::merge::MergedPermissions;
use crate::record::PermissionRecord;
use crate::value::AttributeValue;

/// Muting entries by identity key.
///
/// Unlike merge, muting is not cumulative: the last entry seen for a key
/// replaces any earlier one.
#[derive(Debug, Clone, Default)]
pub struct MutingRules {
    rules: HashMap<String, PermissionRecord>,
}

impl MutingRules {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Add a muting entry, replacing any earlier entry for the same key.
    pub fn insert(&mut self, record: PermissionRecord) {
        self.rules.insert(record.key.clone(), record);
    }

    /// Add several muting entries in order.
    pub fn insert_all<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = PermissionRecord>,
    {
        for record in records {
            self.insert(record);
        }
    }

    /// The muting entry for a key, if any.
    pub fn get(&self, key: &str) -> Option<&PermissionRecord> {
        self.rules.get(key)
    }

    /// Get the count of muted keys.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromIterator<PermissionRecord> for MutingRules {
    fn from_iter<T: IntoIterator<Item = PermissionRecord>>(iter: T) -> Self {
        let mut rules = MutingRules::new();
        rules.insert_all(iter);
        rules
    }
}

/// Apply one muting entry to a merged record.
///
/// Each attribute on `muting` is written to `record` as a canonical boolean.
///
/// # Example
///
/// ```
/// use permset_core::{apply_muting, AttributeValue, PermissionRecord};
///
/// let merged = PermissionRecord::new("A", "Account")
///     .with_attribute("allowRead", true)
///     .with_attribute("allowEdit", true);
/// let mute = PermissionRecord::new("Mute", "Account").with_attribute("allowEdit", false);
///
/// let muted = apply_muting(merged, &mute);
/// assert_eq!(muted.get("allowRead"), Some(&AttributeValue::Bool(true)));
/// assert_eq!(muted.get("allowEdit"), Some(&AttributeValue::Bool(false)));
/// ```
pub fn apply_muting(mut record: PermissionRecord, muting: &PermissionRecord) -> PermissionRecord {
    for (name, value) in &muting.attributes {
        record
            .attributes
            .insert(name.clone(), AttributeValue::Bool(value.is_truthy()));
    }
    record
}

/// Produce the final group view from merged records and muting rules.
///
/// Output follows the merged key order. Every record is re-tagged with the
/// group name. Muting entries for keys that no member set declares are
/// ignored.
pub fn resolve(merged: MergedPermissions, muting: &MutingRules, group: &str) -> Vec<PermissionRecord> {
    merged
        .into_records()
        .into_iter()
        .map(|record| {
            let record = match muting.get(&record.key) {
                Some(rule) => apply_muting(record, rule),
                None => record,
            };
            record.into_group(group)
        })
        .collect()
}
