//! # Permission Set Metadata
//!
//! Reads permission set metadata from a source format project and feeds it
//! to `permset-core`.
//!
//! ## Overview
//!
//! The permset-metadata crate handles:
//! - **Project discovery**: Find `sfdx-project.json` and the package directory
//! - **Layout**: Map permission set, muting permission set and group names to files
//! - **Parsing**: Read metadata XML into sections of records and scalars
//! - **Reading**: Implement [`permset_core::SourceReader`] over the project
//!
//! ## Layout
//!
//! ```text
//! <project>/sfdx-project.json
//! <project>/<package>/main/default/permissionsets/<name>.permissionset-meta.xml
//! <project>/<package>/main/default/mutingpermissionsets/<name>.mutingpermissionset-meta.xml
//! <project>/<package>/main/default/permissionsetgroups/<name>.permissionsetgroup-meta.xml
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use permset_core::{Aggregator, PermissionKind};
//! use permset_metadata::{LayoutConfig, ProjectSourceReader};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let reader = ProjectSourceReader::open(&LayoutConfig::from_env())?;
//!     let group = reader.load_group("Sales").await?;
//!
//!     let resolution = Aggregator::new(reader)
//!         .resolve_group(&group, PermissionKind::ObjectPermissions)
//!         .await?;
//!
//!     for record in &resolution.records {
//!         println!("{}", record.key);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod project;
pub mod reader;

// Re-export main types
pub use config::LayoutConfig;
pub use document::{MetadataDocument, Node};
pub use error::{MetadataError, MetadataResult};
pub use project::{MetadataType, Project};
pub use reader::ProjectSourceReader;
