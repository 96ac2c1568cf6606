//! `sday ps2csv`: export one permission type of a single permission set.

use anyhow::{Context, Result};
use permset_core::Aggregator;
use permset_metadata::MetadataType;
use tracing::info;

use super::{emit, ExportArgs};
use crate::output::ColumnOrder;

pub async fn run(args: &ExportArgs, json: bool) -> Result<()> {
    let reader = args.reader()?;
    let path = reader
        .project()
        .path_for(MetadataType::PermissionSet, &args.permissionset);

    let resolution = Aggregator::new(reader)
        .extract_single(&args.permissionset, args.permission)
        .await
        .with_context(|| format!("exporting {} from {}", args.permission, path.display()))?;

    info!(
        permissionset = %args.permissionset,
        permission = %args.permission,
        rows = resolution.len(),
        "Exporting permission set"
    );

    let order = ColumnOrder::PermissionSet {
        first: args.firstcol.clone(),
    };
    emit(args, path, &resolution, order, json).await
}
