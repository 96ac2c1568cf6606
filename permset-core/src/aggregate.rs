//! # Aggregation
//!
//! Drives extraction, merge and muting for a single permission set or for a
//! whole permission set group.
//!
//! Reads within a phase run concurrently, but results are consumed in the
//! order the members are listed, so first-seen key order and last-wins
//! muting never depend on which read finishes first.

use futures::future::join_all;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::diagnostic::Diagnostic;
use crate::error::{PermissionError, PermissionResult};
use crate::extract::extract;
use crate::kind::PermissionKind;
use crate::merge::MergedPermissions;
use crate::muting::{resolve, MutingRules};
use crate::record::PermissionRecord;
use crate::source::{SourceReader, SourceRole};

/// A permission set group: member sets merged with OR, then muted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDescriptor {
    /// Group name, used as the `PSG` tag on resolved records.
    pub name: String,
    /// Contributing permission sets, in listed order.
    #[serde(default)]
    pub contributing: Vec<String>,
    /// Muting permission sets, in listed order.
    #[serde(default)]
    pub overriding: Vec<String>,
}

impl GroupDescriptor {
    /// Create a group with no members.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder-style contributing member.
    pub fn with_permission_set(mut self, name: impl Into<String>) -> Self {
        self.contributing.push(name.into());
        self
    }

    /// Builder-style muting member.
    pub fn with_muting_set(mut self, name: impl Into<String>) -> Self {
        self.overriding.push(name.into());
        self
    }
}

/// Outcome of an extraction or group resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resolution {
    /// Permission set or group name.
    pub name: String,
    /// Kind that was extracted.
    pub kind: PermissionKind,
    /// Final records.
    pub records: Vec<PermissionRecord>,
    /// Non-fatal findings collected along the way.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    /// Attribute names across all records, in first-seen order.
    ///
    /// Records of one kind normally share their attribute set, but muting can
    /// add an attribute to a single record. The union gives writers one
    /// header that covers every record.
    pub fn columns(&self) -> Vec<String> {
        let names: IndexSet<&str> = self
            .records
            .iter()
            .flat_map(|record| record.attributes.keys().map(String::as_str))
            .collect();
        names.into_iter().map(str::to_string).collect()
    }

    /// Get the count of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Resolves permission sets and groups through a [`SourceReader`].
///
/// # Example
///
/// ```rust,no_run
/// use permset_core::{
///     Aggregator, AttributeValue, GroupDescriptor, MemorySourceReader, PermissionKind, RawEntry,
///     RawSource,
/// };
///
/// fn object(name: &str, read: bool, edit: bool) -> RawEntry {
///     let mut e = RawEntry::new();
///     e.insert("object".into(), AttributeValue::from(name));
///     e.insert("allowRead".into(), AttributeValue::Bool(read));
///     e.insert("allowEdit".into(), AttributeValue::Bool(edit));
///     e
/// }
///
/// async fn example() {
///     let reader = MemorySourceReader::new()
///         .with("A", RawSource::new().with_section("objectPermissions", vec![object("Account", true, false)]))
///         .with("B", RawSource::new().with_section("objectPermissions", vec![object("Account", false, true)]));
///
///     let group = GroupDescriptor::new("Bundle")
///         .with_permission_set("A")
///         .with_permission_set("B");
///
///     let resolution = Aggregator::new(reader)
///         .resolve_group(&group, PermissionKind::ObjectPermissions)
///         .await
///         .unwrap();
///
///     let account = &resolution.records[0];
///     assert_eq!(account.get("allowRead"), Some(&AttributeValue::Bool(true)));
///     assert_eq!(account.get("allowEdit"), Some(&AttributeValue::Bool(true)));
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Aggregator<R> {
    reader: R,
}

impl<R: SourceReader> Aggregator<R> {
    /// Create an aggregator over a reader.
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Borrow the underlying reader.
    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Extract one permission set, with no merge or muting.
    ///
    /// # Errors
    ///
    /// - [`PermissionError::SourceNotFound`] if the set cannot be read
    /// - [`PermissionError::EmptyResultSet`] if it declares nothing of `kind`
    pub async fn extract_single(&self, name: &str, kind: PermissionKind) -> PermissionResult<Resolution> {
        let raw = self.reader.read(SourceRole::PermissionSet, name).await?;
        let extraction = extract(name, raw, kind);

        debug!(source = %name, kind = %kind, records = extraction.records.len(), "Extracted permission set");

        if extraction.records.is_empty() {
            return Err(PermissionError::EmptyResultSet {
                kind,
                name: name.to_string(),
            });
        }

        Ok(Resolution {
            name: name.to_string(),
            kind,
            records: extraction.records,
            diagnostics: extraction.diagnostics,
        })
    }

    /// Resolve a permission set group.
    ///
    /// Members that cannot be read are skipped and reported as
    /// [`Diagnostic::SourceSkipped`].
    ///
    /// # Errors
    ///
    /// - [`PermissionError::EmptyResultSet`] if no member contributes a record
    /// - any non-recoverable error raised by the reader
    pub async fn resolve_group(
        &self,
        group: &GroupDescriptor,
        kind: PermissionKind,
    ) -> PermissionResult<Resolution> {
        let mut diagnostics = Vec::new();

        let contributed = self
            .read_phase(SourceRole::PermissionSet, &group.contributing, kind, &mut diagnostics)
            .await?;
        let merged: MergedPermissions = contributed.into_iter().collect();

        let muting: MutingRules = self
            .read_phase(SourceRole::Muting, &group.overriding, kind, &mut diagnostics)
            .await?
            .into_iter()
            .collect();

        info!(
            group = %group.name,
            kind = %kind,
            merged = merged.len(),
            muted = muting.len(),
            "Resolved permission set group"
        );

        let records = resolve(merged, &muting, &group.name);
        if records.is_empty() {
            return Err(PermissionError::EmptyResultSet {
                kind,
                name: group.name.clone(),
            });
        }

        Ok(Resolution {
            name: group.name.clone(),
            kind,
            records,
            diagnostics,
        })
    }

    /// Read and extract every member of one phase, in listed order.
    async fn read_phase(
        &self,
        role: SourceRole,
        names: &[String],
        kind: PermissionKind,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> PermissionResult<Vec<PermissionRecord>> {
        let results = join_all(names.iter().map(|name| self.reader.read(role, name))).await;

        let mut records = Vec::new();
        for (name, result) in names.iter().zip(results) {
            match result {
                Ok(raw) => {
                    let extraction = extract(name, raw, kind);
                    records.extend(extraction.records);
                    diagnostics.extend(extraction.diagnostics);
                }
                Err(e) if e.is_recoverable() => {
                    warn!(role = %role, source = %name, error = %e, "Skipping unreadable group member");
                    diagnostics.push(Diagnostic::SourceSkipped {
                        role,
                        source: name.clone(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Origin;
    use crate::source::{MemorySourceReader, RawEntry, RawSource};
    use crate::value::AttributeValue;

    fn user_permission(name: &str, enabled: bool) -> RawEntry {
        let mut e = RawEntry::new();
        e.insert("enabled".into(), AttributeValue::Bool(enabled));
        e.insert("name".into(), AttributeValue::from(name));
        e
    }

    fn source(entries: Vec<RawEntry>) -> RawSource {
        RawSource::new().with_section("userPermissions", entries)
    }

    fn reader() -> MemorySourceReader {
        MemorySourceReader::new()
            .with(
                "Api",
                source(vec![user_permission("ApiEnabled", true), user_permission("ViewSetup", false)]),
            )
            .with(
                "Admin",
                source(vec![user_permission("ViewSetup", true), user_permission("ModifyAllData", true)]),
            )
            .with_muting("NoSetup", source(vec![user_permission("ViewSetup", false)]))
    }

    #[tokio::test]
    async fn test_extract_single() {
        let aggregator = Aggregator::new(reader());
        let resolution = aggregator
            .extract_single("Api", PermissionKind::UserPermissions)
            .await
            .unwrap();

        assert_eq!(resolution.len(), 2);
        assert_eq!(resolution.records[0].origin, Origin::PermissionSet("Api".into()));
        assert_eq!(resolution.columns(), vec!["enabled".to_string()]);
    }

    #[tokio::test]
    async fn test_extract_single_missing_is_fatal() {
        let aggregator = Aggregator::new(reader());
        let err = aggregator
            .extract_single("Nope", PermissionKind::UserPermissions)
            .await
            .unwrap_err();
        assert!(matches!(err, PermissionError::SourceNotFound { .. }));
    }

    #[tokio::test]
    async fn test_extract_single_empty_kind() {
        let aggregator = Aggregator::new(reader());
        let err = aggregator
            .extract_single("Api", PermissionKind::ObjectPermissions)
            .await
            .unwrap_err();
        assert!(matches!(err, PermissionError::EmptyResultSet { .. }));
    }

    #[tokio::test]
    async fn test_resolve_group_with_muting() {
        let group = GroupDescriptor::new("Ops")
            .with_permission_set("Api")
            .with_permission_set("Admin")
            .with_muting_set("NoSetup");

        let resolution = Aggregator::new(reader())
            .resolve_group(&group, PermissionKind::UserPermissions)
            .await
            .unwrap();

        let keys: Vec<&str> = resolution.records.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["ApiEnabled", "ViewSetup", "ModifyAllData"]);

        // Admin granted ViewSetup, the muting set takes it back
        assert_eq!(resolution.records[1].get("enabled"), Some(&AttributeValue::Bool(false)));
        assert!(resolution
            .records
            .iter()
            .all(|r| r.origin == Origin::Group("Ops".into())));
        assert!(resolution.diagnostics.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_group_skips_missing_members() {
        let group = GroupDescriptor::new("Ops")
            .with_permission_set("Api")
            .with_permission_set("Gone")
            .with_muting_set("AlsoGone");

        let resolution = Aggregator::new(reader())
            .resolve_group(&group, PermissionKind::UserPermissions)
            .await
            .unwrap();

        assert_eq!(resolution.len(), 2);
        assert_eq!(resolution.diagnostics.len(), 2);
        assert!(matches!(
            &resolution.diagnostics[0],
            Diagnostic::SourceSkipped { role: SourceRole::PermissionSet, source, .. } if source == "Gone"
        ));
        assert!(matches!(
            &resolution.diagnostics[1],
            Diagnostic::SourceSkipped { role: SourceRole::Muting, source, .. } if source == "AlsoGone"
        ));
    }

    #[tokio::test]
    async fn test_resolve_group_all_members_missing() {
        let group = GroupDescriptor::new("Ghost").with_permission_set("Gone");
        let err = Aggregator::new(reader())
            .resolve_group(&group, PermissionKind::UserPermissions)
            .await
            .unwrap_err();
        assert!(matches!(err, PermissionError::EmptyResultSet { ref name, .. } if name == "Ghost"));
    }

    #[tokio::test]
    async fn test_columns_cover_attributes_added_by_muting() {
        let mut mute = user_permission("ApiEnabled", false);
        mute.insert("delegated".into(), AttributeValue::Bool(true));
        let reader = reader().with_muting("Narrow", source(vec![mute]));

        let group = GroupDescriptor::new("Ops")
            .with_permission_set("Api")
            .with_muting_set("Narrow");
        let resolution = Aggregator::new(reader)
            .resolve_group(&group, PermissionKind::UserPermissions)
            .await
            .unwrap();

        assert_eq!(resolution.records[0].get("delegated"), Some(&AttributeValue::Bool(true)));
        assert!(resolution.records[1].get("delegated").is_none());
        assert_eq!(resolution.columns(), vec!["enabled".to_string(), "delegated".to_string()]);
    }

    #[test]
    fn test_group_descriptor_serde_defaults() {
        let group: GroupDescriptor = serde_json::from_str(r#"{"name": "Ops", "contributing": ["Api"]}"#).unwrap();
        assert_eq!(group, GroupDescriptor::new("Ops").with_permission_set("Api"));
    }
}
