//! # Permission Kinds
//!
//! The three categories of permission declarations that can be extracted
//! from a permission set, and the attribute that identifies each entry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PermissionError;

/// Category of permission being extracted or aggregated.
///
/// Serializes using the metadata section names (`objectPermissions`,
/// `fieldPermissions`, `userPermissions`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum PermissionKind {
    /// Object-level CRUD permissions, keyed by `object`.
    ObjectPermissions,

    /// Field-level security, keyed by `field`.
    FieldPermissions,

    /// System/user permissions, keyed by `name`.
    UserPermissions,
}

impl PermissionKind {
    /// Get the metadata section name for this kind.
    ///
    /// # Returns
    ///
    /// A static string such as `"objectPermissions"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionKind::ObjectPermissions => "objectPermissions",
            PermissionKind::FieldPermissions => "fieldPermissions",
            PermissionKind::UserPermissions => "userPermissions",
        }
    }

    /// Name of the attribute that holds the identity key for this kind.
    ///
    /// # Example
    ///
    /// ```
    /// use permset_core::PermissionKind;
    ///
    /// assert_eq!(PermissionKind::ObjectPermissions.key_attribute(), "object");
    /// assert_eq!(PermissionKind::FieldPermissions.key_attribute(), "field");
    /// assert_eq!(PermissionKind::UserPermissions.key_attribute(), "name");
    /// ```
    pub fn key_attribute(&self) -> &'static str {
        match self {
            PermissionKind::ObjectPermissions => "object",
            PermissionKind::FieldPermissions => "field",
            PermissionKind::UserPermissions => "name",
        }
    }

    /// Parse a kind from its section name.
    ///
    /// # Returns
    ///
    /// `Some(PermissionKind)` if valid, `None` otherwise
    pub fn parse(s: &str) -> Option<Self> {
        Self::all().into_iter().find(|kind| kind.as_str() == s)
    }

    /// All supported kinds.
    pub fn all() -> [PermissionKind; 3] {
        [
            PermissionKind::ObjectPermissions,
            PermissionKind::FieldPermissions,
            PermissionKind::UserPermissions,
        ]
    }
}

impl fmt::Display for PermissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionKind {
    type Err = PermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| PermissionError::InvalidKind(s.to_string()))
    }
}
