//! # Record Extraction
//!
//! Turns the raw entries of one permission set into [`PermissionRecord`]s:
//! the kind's identity attribute is promoted to the record key, every other
//! attribute is coerced to its canonical value and kept in source order.

use tracing::warn;

use crate::diagnostic::Diagnostic;
use crate::kind::PermissionKind;
use crate::record::PermissionRecord;
use crate::source::{RawEntry, RawSource};
use crate::value::Attributes;

/// Records extracted from one source, plus anything worth reporting.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Records in document order.
    pub records: Vec<PermissionRecord>,
    /// Advisory findings (malformed keys).
    pub diagnostics: Vec<Diagnostic>,
}

/// Split an entry into its identity key and remaining attributes.
///
/// A missing or blank key attribute yields the empty string. Remaining values are
/// canonicalized, so `"true"`/`"false"` text becomes a boolean.
///
/// # Example
///
/// ```
/// use permset_core::{extract_key, AttributeValue, PermissionKind, RawEntry};
///
/// let mut raw = RawEntry::new();
/// raw.insert("field".into(), AttributeValue::from("Account.Industry"));
/// raw.insert("readable".into(), AttributeValue::from("true"));
///
/// let (key, attributes) = extract_key(PermissionKind::FieldPermissions, raw);
/// assert_eq!(key, "Account.Industry");
/// assert_eq!(attributes.get("readable"), Some(&AttributeValue::Bool(true)));
/// assert!(attributes.get("field").is_none());
/// ```
pub fn extract_key(kind: PermissionKind, mut raw: RawEntry) -> (String, Attributes) {
    let key = raw
        .shift_remove(kind.key_attribute())
        .map(|value| value.to_string())
        .filter(|key| !key.trim().is_empty())
        .unwrap_or_default();

    let attributes = raw
        .into_iter()
        .map(|(name, value)| (name, value.canonical()))
        .collect();

    (key, attributes)
}

/// Extract every entry of `kind` from a permission set.
///
/// A source without a section for `kind` produces no records. Entries
/// without a usable key are still extracted, with an empty key, and reported
/// as [`Diagnostic::MalformedKey`].
pub fn extract(source_name: &str, mut raw: RawSource, kind: PermissionKind) -> Extraction {
    let mut extraction = Extraction::default();

    let Some(section) = raw.take_section(kind) else {
        return extraction;
    };

    for (index, entry) in section.into_entries().into_iter().enumerate() {
        let has_key = entry
            .get(kind.key_attribute())
            .is_some_and(|value| !value.to_string().trim().is_empty());
        if !has_key {
            warn!(
                source = %source_name,
                kind = %kind,
                index,
                "Permission entry has no identity attribute"
            );
            extraction.diagnostics.push(Diagnostic::MalformedKey {
                source: source_name.to_string(),
                kind,
                index,
            });
        }

        let (key, attributes) = extract_key(kind, entry);
        let mut record = PermissionRecord::new(source_name, key);
        record.attributes = attributes;
        extraction.records.push(record);
    }

    extraction
}
