//! Command implementations.

use anyhow::{Context, Result};
use clap::Args;
use indexmap::IndexMap;
use permset_core::{AttributeValue, PermissionError, PermissionKind, Resolution};
use permset_metadata::{LayoutConfig, ProjectSourceReader};
use serde::Serialize;
use std::path::PathBuf;

use crate::output::{json_rows, ColumnOrder, Destination};

pub mod ps2csv;
pub mod psg2csv;

/// Arguments shared by the export commands.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Permission set (ps2csv) or permission set group (psg2csv) name, with
    /// or without the metadata file extension
    #[arg(short = 'p', long)]
    pub permissionset: String,

    /// Permission type to export
    #[arg(short = 'r', long, value_parser = parse_kind)]
    pub permission: PermissionKind,

    /// Project directory (defaults to SDAY_PROJECT_DIR, then the current directory)
    #[arg(short = 'd', long)]
    pub projectdir: Option<PathBuf>,

    /// Write to this file instead of stdout (CSV, or XLSX for an .xlsx name)
    #[arg(short = 'f', long)]
    pub outputfile: Option<PathBuf>,

    /// Column to place first
    #[arg(short = 'c', long)]
    pub firstcol: Option<String>,
}

impl ExportArgs {
    /// Layout configuration from the environment, with `--projectdir` applied.
    pub fn layout(&self) -> LayoutConfig {
        let config = LayoutConfig::from_env();
        match &self.projectdir {
            Some(dir) => config.with_project_dir(dir),
            None => config,
        }
    }

    /// Open a reader over the configured project.
    pub fn reader(&self) -> Result<ProjectSourceReader> {
        let layout = self.layout();
        ProjectSourceReader::open(&layout)
            .with_context(|| format!("resolving project from {}", layout.project_dir.display()))
    }
}

fn parse_kind(s: &str) -> Result<PermissionKind, String> {
    s.parse().map_err(|e: PermissionError| e.to_string())
}

/// `--json` result.
#[derive(Debug, Serialize)]
struct ExportResult<'a> {
    /// Metadata file the export was read from.
    path: String,
    permissionset: &'a str,
    permission: PermissionKind,
    data: Vec<IndexMap<String, AttributeValue>>,
}

/// Write a resolution to the chosen destination, or as JSON to stdout.
pub(crate) async fn emit(
    args: &ExportArgs,
    source_path: PathBuf,
    resolution: &Resolution,
    order: ColumnOrder,
    json: bool,
) -> Result<()> {
    let columns = order.columns(resolution);

    if json {
        let result = ExportResult {
            path: source_path.display().to_string(),
            permissionset: &args.permissionset,
            permission: args.permission,
            data: json_rows(resolution, &columns),
        };
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    Destination::from_flag(args.outputfile.as_deref())
        .write(&columns, resolution)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!(parse_kind("fieldPermissions"), Ok(PermissionKind::FieldPermissions));
        let err = parse_kind("tabSettings").unwrap_err();
        assert!(err.contains("tabSettings"));
    }
}
