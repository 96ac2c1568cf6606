//! `sday psg2csv`: export one permission type of a permission set group,
//! with member permission sets merged and muting applied.

use anyhow::{Context, Result};
use permset_core::Aggregator;
use permset_metadata::MetadataType;
use tracing::{info, warn};

use super::{emit, ExportArgs};
use crate::output::ColumnOrder;

pub async fn run(args: &ExportArgs, json: bool) -> Result<()> {
    if args.firstcol.is_some() {
        warn!("--firstcol is deprecated for psg2csv and is ignored");
    }

    let reader = args.reader()?;
    let path = reader
        .project()
        .path_for(MetadataType::PermissionSetGroup, &args.permissionset);

    let group = reader
        .load_group(&args.permissionset)
        .await
        .with_context(|| format!("reading group {}", path.display()))?;

    let resolution = Aggregator::new(reader)
        .resolve_group(&group, args.permission)
        .await
        .with_context(|| format!("exporting {} from {}", args.permission, path.display()))?;

    info!(
        group = %group.name,
        permission = %args.permission,
        members = group.contributing.len(),
        muting = group.overriding.len(),
        rows = resolution.len(),
        "Exporting permission set group"
    );

    emit(args, path, &resolution, ColumnOrder::Group, json).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use permset_core::PermissionKind;
    use std::fs;
    use std::io;
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    const PROJECT_FILE: &str = r#"{ "packageDirectories": [{ "path": "force-app", "default": true }] }"#;

    const VIEW: &str = r#"<PermissionSet xmlns="http://soap.sforce.com/2006/04/metadata">
    <objectPermissions>
        <allowEdit>false</allowEdit>
        <allowRead>true</allowRead>
        <object>Case</object>
    </objectPermissions>
</PermissionSet>"#;

    const EDIT: &str = r#"<PermissionSet xmlns="http://soap.sforce.com/2006/04/metadata">
    <objectPermissions>
        <allowEdit>true</allowEdit>
        <allowRead>true</allowRead>
        <object>Case</object>
    </objectPermissions>
</PermissionSet>"#;

    const MUTE: &str = r#"<MutingPermissionSet xmlns="http://soap.sforce.com/2006/04/metadata">
    <objectPermissions>
        <allowEdit>false</allowEdit>
        <object>Case</object>
    </objectPermissions>
</MutingPermissionSet>"#;

    const GROUP: &str = r#"<PermissionSetGroup xmlns="http://soap.sforce.com/2006/04/metadata">
    <mutingPermissionSets>CaseMute</mutingPermissionSets>
    <permissionSets>CaseView</permissionSets>
    <permissionSets>CaseEdit</permissionSets>
</PermissionSetGroup>"#;

    const PARTIAL_GROUP: &str = r#"<PermissionSetGroup xmlns="http://soap.sforce.com/2006/04/metadata">
    <permissionSets>CaseView</permissionSets>
    <permissionSets>Gone</permissionSets>
</PermissionSetGroup>"#;

    /// Log sink shared between a test and its subscriber.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "sfdx-project.json", PROJECT_FILE);
        write(root, "force-app/main/default/permissionsets/CaseView.permissionset-meta.xml", VIEW);
        write(root, "force-app/main/default/permissionsets/CaseEdit.permissionset-meta.xml", EDIT);
        write(
            root,
            "force-app/main/default/mutingpermissionsets/CaseMute.mutingpermissionset-meta.xml",
            MUTE,
        );
        write(
            root,
            "force-app/main/default/permissionsetgroups/Support.permissionsetgroup-meta.xml",
            GROUP,
        );
        write(
            root,
            "force-app/main/default/permissionsetgroups/Triage.permissionsetgroup-meta.xml",
            PARTIAL_GROUP,
        );
        dir
    }

    fn args(dir: &Path, name: &str, out: &Path) -> ExportArgs {
        ExportArgs {
            permissionset: name.to_string(),
            permission: PermissionKind::ObjectPermissions,
            projectdir: Some(dir.to_path_buf()),
            outputfile: Some(out.to_path_buf()),
            firstcol: None,
        }
    }

    #[tokio::test]
    async fn test_group_export_to_file() {
        let dir = project();
        let out = dir.path().join("support.csv");

        run(&args(dir.path(), "Support", &out), false).await.unwrap();

        let csv = fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Name,allowEdit,allowRead,PSG");
        assert_eq!(lines[1], "Case,FALSE,TRUE,Support");
        assert_eq!(lines.len(), 2);
    }

    #[tokio::test]
    async fn test_single_export_to_file() {
        let dir = project();
        let out = dir.path().join("edit.csv");

        let mut args = args(dir.path(), "CaseEdit", &out);
        args.firstcol = Some("allowRead".into());
        crate::commands::ps2csv::run(&args, false).await.unwrap();

        let csv = fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "allowRead,Name,PS,allowEdit");
        assert_eq!(lines[1], "TRUE,Case,CaseEdit,TRUE");
    }

    #[tokio::test]
    async fn test_missing_group_fails() {
        let dir = project();
        let out = dir.path().join("none.csv");

        let err = run(&args(dir.path(), "Nope", &out), false).await.unwrap_err();
        assert!(format!("{err:#}").contains("Nope"));
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn test_group_export_to_xlsx() {
        use calamine::{open_workbook, Data, Reader, Xlsx};

        let dir = project();
        let out = dir.path().join("support.xlsx");

        run(&args(dir.path(), "Support", &out), false).await.unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&out).unwrap();
        let range = workbook.worksheet_range("objectPermissions").unwrap();
        assert_eq!(range.get_size(), (2, 4));
        assert_eq!(range.get_value((0, 3)), Some(&Data::String("PSG".into())));
        assert_eq!(range.get_value((1, 0)), Some(&Data::String("Case".into())));
        assert_eq!(range.get_value((1, 1)), Some(&Data::Bool(false)));
        assert_eq!(range.get_value((1, 2)), Some(&Data::Bool(true)));
        assert_eq!(range.get_value((1, 3)), Some(&Data::String("Support".into())));
    }

    #[tokio::test]
    async fn test_skipped_member_reported_once() {
        let dir = project();
        let out = dir.path().join("triage.csv");

        let logs = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        run(&args(dir.path(), "Triage", &out), false).await.unwrap();

        let text = logs.text();
        let reports: Vec<&str> = text.lines().filter(|line| line.contains("Gone")).collect();
        assert_eq!(reports.len(), 1, "{text}");
        assert!(reports[0].contains("WARN"));

        let csv = fs::read_to_string(&out).unwrap();
        assert_eq!(csv.lines().nth(1), Some("Case,FALSE,TRUE,Triage"));
    }
}
