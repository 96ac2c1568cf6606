//! # Permission Records
//!
//! The canonical shape every extracted permission entry is normalized into:
//! an identity key, an origin tag and an ordered attribute bag.

use serde::{Deserialize, Serialize};

use crate::value::{AttributeValue, Attributes};

/// Column name used for the identity key in tabular output.
pub const KEY_COLUMN: &str = "Name";

/// Where a record came from.
///
/// Extraction tags records with the permission set they were read from.
/// Group resolution replaces that tag with the group's own name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    /// Read from a single permission set (column `PS`).
    #[serde(rename = "PS")]
    PermissionSet(String),

    /// Resolved through a permission set group (column `PSG`).
    #[serde(rename = "PSG")]
    Group(String),
}

impl Origin {
    /// Column tag for this origin: `"PS"` or `"PSG"`.
    pub fn tag(&self) -> &'static str {
        match self {
            Origin::PermissionSet(_) => "PS",
            Origin::Group(_) => "PSG",
        }
    }

    /// Identifier of the permission set or group.
    pub fn name(&self) -> &str {
        match self {
            Origin::PermissionSet(name) | Origin::Group(name) => name,
        }
    }
}

/// One permission entry after extraction.
///
/// `key` and `origin` are structural and never appear in `attributes`.
///
/// # Example
///
/// ```
/// use permset_core::{PermissionRecord, AttributeValue};
///
/// let record = PermissionRecord::new("Sales", "Account")
///     .with_attribute("allowRead", true)
///     .with_attribute("allowEdit", false);
///
/// assert_eq!(record.source(), "Sales");
/// assert_eq!(record.get("allowRead"), Some(&AttributeValue::Bool(true)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionRecord {
    /// Identity key (object name, field API name or permission name).
    pub key: String,
    /// Source tag.
    pub origin: Origin,
    /// Remaining attributes in source order.
    pub attributes: Attributes,
}

impl PermissionRecord {
    /// Create an empty record read from permission set `source`.
    pub fn new(source: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            origin: Origin::PermissionSet(source.into()),
            attributes: Attributes::new(),
        }
    }

    /// Builder-style attribute insertion.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Identifier of the source this record was read from or resolved for.
    pub fn source(&self) -> &str {
        self.origin.name()
    }

    /// Look up an attribute.
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Render a column of this record: the key, the origin tag, or an
    /// attribute.
    ///
    /// Returns `None` when the column is neither structural nor present.
    pub fn column(&self, column: &str) -> Option<String> {
        if column == KEY_COLUMN {
            return Some(self.key.clone());
        }
        if column == self.origin.tag() {
            return Some(self.origin.name().to_string());
        }
        self.attributes.get(column).map(ToString::to_string)
    }

    /// Reassign this record to a group, dropping its permission set tag.
    pub(crate) fn into_group(mut self, group: &str) -> Self {
        self.origin = Origin::Group(group.to_string());
        self
    }
}
