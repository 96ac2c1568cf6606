//! # Project Layout
//!
//! Finds the project root, picks its package directory and maps metadata
//! names to file paths.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::{LayoutConfig, DEFAULT_PACKAGE_DIR, METADATA_ROOT, PROJECT_FILE};
use crate::error::{MetadataError, MetadataResult};

/// Metadata types this crate reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataType {
    /// `PermissionSet`
    PermissionSet,
    /// `MutingPermissionSet`
    MutingPermissionSet,
    /// `PermissionSetGroup`
    PermissionSetGroup,
}

impl MetadataType {
    /// Folder holding this type under `main/default`.
    pub fn directory(&self) -> &'static str {
        match self {
            MetadataType::PermissionSet => "permissionsets",
            MetadataType::MutingPermissionSet => "mutingpermissionsets",
            MetadataType::PermissionSetGroup => "permissionsetgroups",
        }
    }

    /// File suffix for this type.
    pub fn extension(&self) -> &'static str {
        match self {
            MetadataType::PermissionSet => ".permissionset-meta.xml",
            MetadataType::MutingPermissionSet => ".mutingpermissionset-meta.xml",
            MetadataType::PermissionSetGroup => ".permissionsetgroup-meta.xml",
        }
    }

    /// Expected document root element.
    pub fn root_element(&self) -> &'static str {
        match self {
            MetadataType::PermissionSet => "PermissionSet",
            MetadataType::MutingPermissionSet => "MutingPermissionSet",
            MetadataType::PermissionSetGroup => "PermissionSetGroup",
        }
    }

    /// File name for `name`, which may already carry the extension.
    ///
    /// # Example
    ///
    /// ```
    /// use permset_metadata::MetadataType;
    ///
    /// let ty = MetadataType::PermissionSet;
    /// assert_eq!(ty.file_name("Sales"), "Sales.permissionset-meta.xml");
    /// assert_eq!(ty.file_name("Sales.permissionset-meta.xml"), "Sales.permissionset-meta.xml");
    /// ```
    pub fn file_name(&self, name: &str) -> String {
        if name.ends_with(self.extension()) {
            name.to_string()
        } else {
            format!("{}{}", name, self.extension())
        }
    }
}

impl fmt::Display for MetadataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.root_element())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectFile {
    #[serde(default)]
    package_directories: Vec<PackageDirectory>,
}

#[derive(Debug, Deserialize)]
struct PackageDirectory {
    path: String,
    #[serde(default)]
    default: bool,
}

/// A resolved project: its root and the package directory metadata is read
/// from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    root: PathBuf,
    package_dir: PathBuf,
}

impl Project {
    /// Create a project from known paths, without touching the filesystem.
    pub fn new(root: impl Into<PathBuf>, package_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            package_dir: package_dir.into(),
        }
    }

    /// Resolve the project described by `config`.
    ///
    /// Searches for `sfdx-project.json` from `config.project_dir` upwards.
    /// The package directory is `config.package_dir` when set, otherwise the
    /// default entry of `packageDirectories`, otherwise its first entry,
    /// otherwise `force-app`.
    ///
    /// # Errors
    ///
    /// - [`MetadataError::ProjectNotFound`] if no project file is found
    /// - [`MetadataError::InvalidProject`] if the project file is not valid JSON
    pub fn resolve(config: &LayoutConfig) -> MetadataResult<Self> {
        let start = config
            .project_dir
            .canonicalize()
            .map_err(|_| MetadataError::ProjectNotFound(config.project_dir.clone()))?;

        let root = start
            .ancestors()
            .find(|dir| dir.join(PROJECT_FILE).is_file())
            .map(Path::to_path_buf)
            .ok_or_else(|| MetadataError::ProjectNotFound(config.project_dir.clone()))?;

        let package_dir = match &config.package_dir {
            Some(dir) => dir.clone(),
            None => Self::default_package_dir(&root.join(PROJECT_FILE))?,
        };

        debug!(root = %root.display(), package = %package_dir.display(), "Resolved project");

        Ok(Self { root, package_dir })
    }

    fn default_package_dir(project_file: &Path) -> MetadataResult<PathBuf> {
        let content = std::fs::read_to_string(project_file)
            .map_err(|e| MetadataError::from_io(project_file, e))?;
        let parsed: ProjectFile = serde_json::from_str(&content).map_err(|e| MetadataError::InvalidProject {
            path: project_file.to_path_buf(),
            reason: e.to_string(),
        })?;

        let chosen = parsed
            .package_directories
            .iter()
            .find(|dir| dir.default)
            .or_else(|| parsed.package_directories.first())
            .map(|dir| dir.path.as_str())
            .unwrap_or(DEFAULT_PACKAGE_DIR);

        Ok(PathBuf::from(chosen))
    }

    /// Project root (the directory holding `sfdx-project.json`).
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Package directory, relative to the root.
    pub fn package_dir(&self) -> &Path {
        &self.package_dir
    }

    /// Folder holding metadata of type `ty`.
    pub fn metadata_dir(&self, ty: MetadataType) -> PathBuf {
        self.root
            .join(&self.package_dir)
            .join(METADATA_ROOT)
            .join(ty.directory())
    }

    /// Path of the `ty` file named `name`.
    pub fn path_for(&self, ty: MetadataType, name: &str) -> PathBuf {
        self.metadata_dir(ty).join(ty.file_name(name))
    }
}
