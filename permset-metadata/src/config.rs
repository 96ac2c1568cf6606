//! Project layout configuration.
//!
//! Locates the project and its metadata directories. Configuration is loaded
//! from environment variables with defaults matching a standard source
//! format project.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name of the project descriptor searched for from `project_dir` upwards.
pub const PROJECT_FILE: &str = "sfdx-project.json";

/// Package directory used when the project file does not mark one default.
pub const DEFAULT_PACKAGE_DIR: &str = "force-app";

/// Path from a package directory to its metadata type folders.
pub const METADATA_ROOT: &str = "main/default";

/// Layout configuration for a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Directory to start the project search from.
    pub project_dir: PathBuf,

    /// Package directory, relative to the project root. When unset it is
    /// taken from `sfdx-project.json`.
    pub package_dir: Option<PathBuf>,
}

impl Default for LayoutConfig {
    /// Returns a configuration rooted at the current directory.
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            package_dir: None,
        }
    }
}

impl LayoutConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SDAY_PROJECT_DIR`: Directory to start the project search from (default: .)
    /// - `SDAY_PACKAGE_DIR`: Package directory overriding `sfdx-project.json`
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            project_dir: std::env::var("SDAY_PROJECT_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.project_dir),
            package_dir: std::env::var("SDAY_PACKAGE_DIR")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
        }
    }

    /// Builder-style project directory.
    pub fn with_project_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.project_dir = dir.into();
        self
    }

    /// Builder-style package directory.
    pub fn with_package_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.package_dir = Some(dir.into());
        self
    }
}
