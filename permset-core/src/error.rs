//! Error types for permission extraction and resolution
//!
//! Extraction, merge and muting are total over well-formed input; the only
//! failures come from locating sources, from an empty result, or from a
//! caller passing an unsupported kind.

use thiserror::Error;

use crate::kind::PermissionKind;

/// Permission extraction error types.
#[derive(Debug, Error)]
pub enum PermissionError {
    /// A named permission set or group could not be located or read
    #[error("Source not found: {name}: {reason}")]
    SourceNotFound {
        /// Source identifier as given by the caller
        name: String,
        /// Underlying cause
        reason: String,
    },

    /// A source was found but its content could not be interpreted
    #[error("Invalid source {name}: {reason}")]
    InvalidSource {
        /// Source identifier as given by the caller
        name: String,
        /// Underlying cause
        reason: String,
    },

    /// Extraction produced no records for the requested kind
    #[error("No {kind} found in {name}")]
    EmptyResultSet {
        /// Requested permission kind
        kind: PermissionKind,
        /// Permission set or group name
        name: String,
    },

    /// Kind selector is not one of the supported sections
    #[error("Unsupported permission kind: {0} (expected objectPermissions, fieldPermissions or userPermissions)")]
    InvalidKind(String),
}

/// Result type for permission operations.
pub type PermissionResult<T> = Result<T, PermissionError>;

impl PermissionError {
    /// Build a `SourceNotFound` error.
    pub fn not_found(name: impl Into<String>, reason: impl ToString) -> Self {
        PermissionError::SourceNotFound {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Build an `InvalidSource` error.
    pub fn invalid_source(name: impl Into<String>, reason: impl ToString) -> Self {
        PermissionError::InvalidSource {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Check if a group aggregation can skip past this error.
    ///
    /// Source-level failures only affect one member of a group; the rest of
    /// the group still resolves.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PermissionError::SourceNotFound { .. } | PermissionError::InvalidSource { .. }
        )
    }

    /// Get error code for machine-readable output.
    pub fn error_code(&self) -> &'static str {
        match self {
            PermissionError::SourceNotFound { .. } => "SOURCE_NOT_FOUND",
            PermissionError::InvalidSource { .. } => "INVALID_SOURCE",
            PermissionError::EmptyResultSet { .. } => "EMPTY_RESULT_SET",
            PermissionError::InvalidKind(_) => "INVALID_KIND",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable() {
        assert!(PermissionError::not_found("Sales", "missing").is_recoverable());
        assert!(PermissionError::invalid_source("Sales", "bad xml").is_recoverable());
        assert!(!PermissionError::InvalidKind("x".into()).is_recoverable());
        assert!(!PermissionError::EmptyResultSet {
            kind: PermissionKind::UserPermissions,
            name: "Sales".into(),
        }
        .is_recoverable());
    }

    #[test]
    fn test_messages() {
        let err = PermissionError::EmptyResultSet {
            kind: PermissionKind::FieldPermissions,
            name: "Support".into(),
        };
        assert_eq!(err.to_string(), "No fieldPermissions found in Support");
        assert_eq!(err.error_code(), "EMPTY_RESULT_SET");
    }
}
