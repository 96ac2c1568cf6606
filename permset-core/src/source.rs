//! # Sources
//!
//! Raw permission set content as handed over by a reader, and the reader
//! abstraction itself. The core never touches files; anything that can
//! produce a [`RawSource`] by name can feed extraction.

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::{PermissionError, PermissionResult};
use crate::kind::PermissionKind;
use crate::value::AttributeValue;

/// One raw permission entry, before key extraction.
pub type RawEntry = IndexMap<String, AttributeValue>;

/// A section's entries.
///
/// Metadata formats commonly collapse a one-element list into a bare
/// object, so both shapes are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCollection {
    /// Several entries, in document order.
    Many(Vec<RawEntry>),
    /// A single bare entry.
    One(RawEntry),
}

impl RawCollection {
    /// Flatten into an ordered list of entries.
    pub fn into_entries(self) -> Vec<RawEntry> {
        match self {
            RawCollection::Many(entries) => entries,
            RawCollection::One(entry) => vec![entry],
        }
    }

    /// Number of entries in the collection.
    pub fn len(&self) -> usize {
        match self {
            RawCollection::Many(entries) => entries.len(),
            RawCollection::One(_) => 1,
        }
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<RawEntry>> for RawCollection {
    fn from(entries: Vec<RawEntry>) -> Self {
        RawCollection::Many(entries)
    }
}

/// The content of one permission set: section name to entries.
///
/// Deserializes transparently from a JSON object such as
/// `{"objectPermissions": [{"object": "Account", "allowRead": true}]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawSource {
    sections: IndexMap<String, RawCollection>,
}

impl RawSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append entries to a section, creating it when absent.
    pub fn push(&mut self, section: impl Into<String>, entry: RawEntry) {
        let slot = self
            .sections
            .entry(section.into())
            .or_insert_with(|| RawCollection::Many(Vec::new()));
        let mut entries = std::mem::replace(slot, RawCollection::Many(Vec::new())).into_entries();
        entries.push(entry);
        *slot = RawCollection::Many(entries);
    }

    /// Builder-style section insertion.
    pub fn with_section(mut self, section: impl Into<String>, entries: impl Into<RawCollection>) -> Self {
        self.sections.insert(section.into(), entries.into());
        self
    }

    /// Remove and return the entries for a permission kind.
    pub fn take_section(&mut self, kind: PermissionKind) -> Option<RawCollection> {
        self.sections.shift_remove(kind.as_str())
    }

    /// Borrow the entries for a permission kind.
    pub fn section(&self, kind: PermissionKind) -> Option<&RawCollection> {
        self.sections.get(kind.as_str())
    }

    /// Section names present in this source.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }
}

/// Why a source is being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceRole {
    /// A permission set whose grants are extracted or OR-merged.
    PermissionSet,
    /// A muting permission set applied after merge.
    Muting,
}

impl SourceRole {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceRole::PermissionSet => "permission set",
            SourceRole::Muting => "muting permission set",
        }
    }
}

impl fmt::Display for SourceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves source identifiers to raw content.
///
/// Implementations return [`PermissionError::SourceNotFound`] when the named
/// source does not exist.
#[async_trait]
pub trait SourceReader: Send + Sync {
    /// Read a source by name.
    async fn read(&self, role: SourceRole, name: &str) -> PermissionResult<RawSource>;
}

/// In-memory reader, for embedding and tests.
///
/// Muting lookups fall back to the permission set table, matching how
/// project readers search both metadata directories.
#[derive(Debug, Clone, Default)]
pub struct MemorySourceReader {
    permission_sets: HashMap<String, RawSource>,
    muting_sets: HashMap<String, RawSource>,
}

impl MemorySourceReader {
    /// Create an empty reader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a permission set.
    pub fn insert(&mut self, name: impl Into<String>, source: RawSource) {
        self.permission_sets.insert(name.into(), source);
    }

    /// Register a muting permission set.
    pub fn insert_muting(&mut self, name: impl Into<String>, source: RawSource) {
        self.muting_sets.insert(name.into(), source);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, source: RawSource) -> Self {
        self.insert(name, source);
        self
    }

    /// Builder-style [`insert_muting`](Self::insert_muting).
    pub fn with_muting(mut self, name: impl Into<String>, source: RawSource) -> Self {
        self.insert_muting(name, source);
        self
    }
}

#[async_trait]
impl SourceReader for MemorySourceReader {
    async fn read(&self, role: SourceRole, name: &str) -> PermissionResult<RawSource> {
        let found = match role {
            SourceRole::Muting => self
                .muting_sets
                .get(name)
                .or_else(|| self.permission_sets.get(name)),
            SourceRole::PermissionSet => self.permission_sets.get(name),
        };

        found
            .cloned()
            .ok_or_else(|| PermissionError::not_found(name, format!("no {} named '{}'", role, name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(object: &str) -> RawEntry {
        let mut e = RawEntry::new();
        e.insert("object".into(), AttributeValue::from(object));
        e
    }

    #[test]
    fn test_push_promotes_single_entry() {
        let mut source = RawSource::new().with_section("objectPermissions", RawCollection::One(entry("Account")));
        source.push("objectPermissions", entry("Contact"));

        let section = source.section(PermissionKind::ObjectPermissions).unwrap();
        assert_eq!(section.len(), 2);
    }

    #[test]
    fn test_deserialize_bare_object_section() {
        let json = r#"{"userPermissions": {"name": "ApiEnabled", "enabled": true}}"#;
        let mut source: RawSource = serde_json::from_str(json).unwrap();

        let entries = source
            .take_section(PermissionKind::UserPermissions)
            .unwrap()
            .into_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].get("enabled"), Some(&AttributeValue::Bool(true)));
        assert!(source.section(PermissionKind::UserPermissions).is_none());
    }

    #[tokio::test]
    async fn test_memory_reader_lookup() {
        let reader = MemorySourceReader::new()
            .with("Sales", RawSource::new())
            .with_muting("SalesMute", RawSource::new());

        assert!(reader.read(SourceRole::PermissionSet, "Sales").await.is_ok());
        assert!(reader.read(SourceRole::Muting, "SalesMute").await.is_ok());
        // Muting lookups fall back to permission sets
        assert!(reader.read(SourceRole::Muting, "Sales").await.is_ok());
        // ...but not the other way around
        let err = reader
            .read(SourceRole::PermissionSet, "SalesMute")
            .await
            .unwrap_err();
        assert!(matches!(err, PermissionError::SourceNotFound { .. }));
    }
}
