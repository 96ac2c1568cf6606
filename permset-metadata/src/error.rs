//! Error types for project discovery and metadata parsing

use permset_core::PermissionError;
use std::path::PathBuf;
use thiserror::Error;

/// Metadata error types.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// No `sfdx-project.json` at or above the starting directory
    #[error("No sfdx-project.json found in {} or any parent directory", .0.display())]
    ProjectNotFound(PathBuf),

    /// `sfdx-project.json` exists but cannot be used
    #[error("Invalid project file {}: {reason}", .path.display())]
    InvalidProject {
        /// Path to the project file
        path: PathBuf,
        /// What is wrong with it
        reason: String,
    },

    /// Metadata file does not exist
    #[error("Metadata file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Metadata file exists but could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Malformed XML
    #[error("XML error at byte {position}: {message}")]
    Xml {
        /// Byte offset where parsing stopped
        position: u64,
        /// Parser message
        message: String,
    },

    /// Well-formed XML describing the wrong metadata type
    #[error("Expected <{expected}> document, found <{found}>")]
    UnexpectedRoot {
        /// Root element the caller asked for
        expected: &'static str,
        /// Root element actually present
        found: String,
    },
}

/// Result type for metadata operations.
pub type MetadataResult<T> = Result<T, MetadataError>;

impl MetadataError {
    /// Build an error from an I/O failure on `path`.
    ///
    /// A missing file becomes [`MetadataError::NotFound`].
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            MetadataError::NotFound(path)
        } else {
            MetadataError::Io { path, source }
        }
    }

    /// Convert into the core error for source `name`.
    ///
    /// Missing and unreadable files are `SourceNotFound`; files that parse
    /// badly are `InvalidSource`.
    pub fn into_permission_error(self, name: &str) -> PermissionError {
        match self {
            MetadataError::NotFound(_) | MetadataError::Io { .. } => {
                PermissionError::not_found(name, self)
            }
            other => PermissionError::invalid_source(name, other),
        }
    }
}
