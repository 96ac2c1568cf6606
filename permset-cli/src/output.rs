//! Tabular rendering of a resolution: column order, cell formatting and the
//! CSV and XLSX writers.

use anyhow::{Context, Result};
use indexmap::IndexMap;
use permset_core::{AttributeValue, PermissionRecord, Resolution, KEY_COLUMN};
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWrite;

/// Column order for an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnOrder {
    /// Single permission set: `Name`, `PS`, then attributes alphabetically.
    /// `first` moves one column to the front.
    PermissionSet {
        /// Column to put first, if present.
        first: Option<String>,
    },
    /// Group: `Name`, attributes in source order, then `PSG`.
    Group,
}

impl ColumnOrder {
    /// Header columns for `resolution`.
    pub fn columns(&self, resolution: &Resolution) -> Vec<String> {
        let mut attributes = resolution.columns();

        match self {
            ColumnOrder::PermissionSet { first } => {
                attributes.sort();
                let mut columns = Vec::with_capacity(attributes.len() + 2);
                columns.push(KEY_COLUMN.to_string());
                columns.push("PS".to_string());
                columns.extend(attributes);

                if let Some(first) = first {
                    if let Some(pos) = columns.iter().position(|c| c == first) {
                        let column = columns.remove(pos);
                        columns.insert(0, column);
                    }
                }
                columns
            }
            ColumnOrder::Group => {
                let mut columns = Vec::with_capacity(attributes.len() + 2);
                columns.push(KEY_COLUMN.to_string());
                columns.extend(attributes);
                columns.push("PSG".to_string());
                columns
            }
        }
    }
}

/// One cell of an export row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// A grant flag.
    Flag(bool),
    /// Text, empty when the record lacks the column.
    Text(String),
}

impl Cell {
    /// Cell for `column` of `record`.
    pub fn of(record: &PermissionRecord, column: &str) -> Self {
        match record.get(column) {
            Some(AttributeValue::Bool(flag)) => Cell::Flag(*flag),
            Some(AttributeValue::Text(text)) => Cell::Text(text.clone()),
            None => Cell::Text(record.column(column).unwrap_or_default()),
        }
    }

    /// Text form: flags print as `TRUE`/`FALSE`.
    pub fn render(&self) -> String {
        match self {
            Cell::Flag(true) => "TRUE".to_string(),
            Cell::Flag(false) => "FALSE".to_string(),
            Cell::Text(text) => text.clone(),
        }
    }
}

/// Render one cell as text.
pub fn cell(record: &PermissionRecord, column: &str) -> String {
    Cell::of(record, column).render()
}

/// Flat rows in column order, for `--json` output.
pub fn json_rows(resolution: &Resolution, columns: &[String]) -> Vec<IndexMap<String, AttributeValue>> {
    resolution
        .records
        .iter()
        .map(|record| {
            columns
                .iter()
                .filter_map(|column| {
                    let value = record
                        .get(column)
                        .cloned()
                        .or_else(|| record.column(column).map(AttributeValue::Text))?;
                    Some((column.clone(), value))
                })
                .collect()
        })
        .collect()
}

/// Write `resolution` as CSV: a header row, then one row per record.
pub async fn write_csv<W>(writer: W, columns: &[String], resolution: &Resolution) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut csv = csv_async::AsyncWriter::from_writer(writer);

    csv.write_record(columns).await.context("writing CSV header")?;
    for record in &resolution.records {
        csv.write_record(columns.iter().map(|column| cell(record, column)))
            .await
            .with_context(|| format!("writing CSV row for {}", record.key))?;
    }
    csv.flush().await.context("flushing CSV output")?;

    Ok(())
}

/// Build an XLSX workbook with one sheet named after the permission kind.
///
/// Flags are written as boolean cells, so spreadsheet tools show them as
/// `TRUE`/`FALSE` like the CSV export.
pub fn build_workbook(columns: &[String], resolution: &Resolution) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet
        .set_name(resolution.kind.as_str())
        .context("naming worksheet")?;

    for (col, name) in columns.iter().enumerate() {
        sheet.write_string(0, col as u16, name.as_str())?;
    }

    for (row, record) in resolution.records.iter().enumerate() {
        let row = row as u32 + 1;
        for (col, column) in columns.iter().enumerate() {
            let col = col as u16;
            match Cell::of(record, column) {
                Cell::Flag(flag) => {
                    sheet.write_boolean(row, col, flag)?;
                }
                Cell::Text(text) if text.is_empty() => {}
                Cell::Text(text) => {
                    sheet.write_string(row, col, text)?;
                }
            }
        }
    }

    Ok(workbook)
}

/// Where an export goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Standard output.
    Stdout,
    /// A CSV file.
    File(PathBuf),
    /// An XLSX workbook.
    Xlsx(PathBuf),
}

impl Destination {
    /// Pick a destination from the `--outputfile` flag. A name ending in
    /// `xlsx` selects a workbook, anything else CSV.
    pub fn from_flag(output: Option<&Path>) -> Self {
        match output {
            None => Destination::Stdout,
            Some(path) => {
                let is_xlsx = path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"));
                if is_xlsx {
                    Destination::Xlsx(path.to_path_buf())
                } else {
                    Destination::File(path.to_path_buf())
                }
            }
        }
    }

    /// Write the export to this destination.
    pub async fn write(&self, columns: &[String], resolution: &Resolution) -> Result<()> {
        match self {
            Destination::Stdout => write_csv(tokio::io::stdout(), columns, resolution).await,
            Destination::File(path) => {
                let file = tokio::fs::File::create(path)
                    .await
                    .with_context(|| format!("creating {}", path.display()))?;
                write_csv(file, columns, resolution).await
            }
            Destination::Xlsx(path) => {
                let buffer = build_workbook(columns, resolution)?
                    .save_to_buffer()
                    .context("encoding XLSX workbook")?;
                tokio::fs::write(path, buffer)
                    .await
                    .with_context(|| format!("writing {}", path.display()))
            }
        }
    }
}
