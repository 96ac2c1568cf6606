//! Non-fatal findings reported alongside a resolution.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::kind::PermissionKind;
use crate::source::SourceRole;

/// Something worth reporting that did not stop extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Diagnostic {
    /// An entry had no identity attribute and was extracted with an empty key.
    ///
    /// Empty-keyed entries collide with each other during group merge.
    MalformedKey {
        /// Permission set the entry came from.
        source: String,
        /// Kind being extracted.
        kind: PermissionKind,
        /// Position of the entry within its section.
        index: usize,
    },

    /// A group member could not be read and was left out.
    SourceSkipped {
        /// Whether the member was contributing or muting.
        role: SourceRole,
        /// Member name.
        source: String,
        /// Error message from the reader.
        reason: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MalformedKey { source, kind, index } => write!(
                f,
                "{} entry #{} in '{}' has no '{}' attribute; using an empty key",
                kind,
                index,
                source,
                kind.key_attribute()
            ),
            Diagnostic::SourceSkipped { role, source, reason } => {
                write!(f, "could not read {} '{}': {}", role, source, reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let d = Diagnostic::MalformedKey {
            source: "Sales".into(),
            kind: PermissionKind::FieldPermissions,
            index: 3,
        };
        assert_eq!(
            d.to_string(),
            "fieldPermissions entry #3 in 'Sales' has no 'field' attribute; using an empty key"
        );

        let d = Diagnostic::SourceSkipped {
            role: SourceRole::Muting,
            source: "Mute".into(),
            reason: "gone".into(),
        };
        assert_eq!(d.to_string(), "could not read muting permission set 'Mute': gone");
    }
}
