//! Filesystem [`SourceReader`] over a project's metadata folders.

use async_trait::async_trait;
use permset_core::{GroupDescriptor, PermissionResult, RawSource, SourceReader, SourceRole};
use std::path::Path;
use tracing::{debug, instrument};

use crate::config::LayoutConfig;
use crate::document::MetadataDocument;
use crate::error::{MetadataError, MetadataResult};
use crate::project::{MetadataType, Project};

/// Group section listing contributing permission sets.
const GROUP_PERMISSION_SETS: &str = "permissionSets";
/// Group section listing muting permission sets.
const GROUP_MUTING_SETS: &str = "mutingPermissionSets";

/// Reads permission sets, muting permission sets and groups from a project.
///
/// Muting permission sets are looked up in `mutingpermissionsets` first and
/// then in `permissionsets`, so groups that list ordinary permission sets as
/// muting members still resolve.
#[derive(Debug, Clone)]
pub struct ProjectSourceReader {
    project: Project,
}

impl ProjectSourceReader {
    /// Create a reader for a resolved project.
    pub fn new(project: Project) -> Self {
        Self { project }
    }

    /// Resolve the project from `config` and create a reader for it.
    pub fn open(config: &LayoutConfig) -> MetadataResult<Self> {
        Ok(Self::new(Project::resolve(config)?))
    }

    /// The underlying project.
    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Read and parse one metadata file, checking its root element.
    pub async fn load(&self, ty: MetadataType, name: &str) -> MetadataResult<MetadataDocument> {
        let path = self.project.path_for(ty, name);
        load_document(&path, ty).await
    }

    /// Read a permission set group's member lists.
    ///
    /// # Errors
    ///
    /// `SourceNotFound` when the group file is missing; `InvalidSource` when
    /// it cannot be parsed.
    #[instrument(skip(self))]
    pub async fn load_group(&self, name: &str) -> PermissionResult<GroupDescriptor> {
        let doc = self
            .load(MetadataType::PermissionSetGroup, name)
            .await
            .map_err(|e| e.into_permission_error(name))?;

        let group = GroupDescriptor {
            name: name.to_string(),
            contributing: doc
                .scalars(GROUP_PERMISSION_SETS)
                .into_iter()
                .map(str::to_string)
                .collect(),
            overriding: doc
                .scalars(GROUP_MUTING_SETS)
                .into_iter()
                .map(str::to_string)
                .collect(),
        };

        debug!(
            contributing = group.contributing.len(),
            overriding = group.overriding.len(),
            "Loaded permission set group"
        );

        Ok(group)
    }

    async fn load_muting(&self, name: &str) -> MetadataResult<MetadataDocument> {
        match self.load(MetadataType::MutingPermissionSet, name).await {
            Err(MetadataError::NotFound(_)) => {
                debug!(source = %name, "No muting permission set file, trying permission sets");
                self.load(MetadataType::PermissionSet, name).await
            }
            other => other,
        }
    }
}

async fn load_document(path: &Path, ty: MetadataType) -> MetadataResult<MetadataDocument> {
    let xml = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| MetadataError::from_io(path, e))?;
    let doc = MetadataDocument::parse(&xml)?;
    doc.expect_root(ty.root_element())?;
    Ok(doc)
}

#[async_trait]
impl SourceReader for ProjectSourceReader {
    async fn read(&self, role: SourceRole, name: &str) -> PermissionResult<RawSource> {
        let doc = match role {
            SourceRole::PermissionSet => self.load(MetadataType::PermissionSet, name).await,
            SourceRole::Muting => self.load_muting(name).await,
        };

        doc.map(MetadataDocument::into_raw_source)
            .map_err(|e| e.into_permission_error(name))
    }
}
