// src/load/mod.rs
use anyhow::Result;
use arrow::{array::StringArray, record_batch::RecordBatch};
use std::{path::Path, sync::Arc};
use tracing::info;

use crate::{error::CombineError, table::upsert_column};

pub mod csv;
pub mod excel;
pub mod infer;
pub mod raw_table;

pub use raw_table::RawTable;

/// Parser family chosen from a file's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Excel,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xlsm" | "xls" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }
}

/// Load one file into a typed table, skipping `skip_rows` rows above the header.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.display()))]
pub fn load_table(path: &Path, skip_rows: usize) -> Result<RecordBatch> {
    let raw = match SourceFormat::from_path(path) {
        Some(SourceFormat::Csv) => csv::read_csv_table(path, skip_rows)?,
        Some(SourceFormat::Excel) => excel::read_excel_table(path, skip_rows)?,
        None => return Err(CombineError::UnsupportedFormat(path.to_path_buf()).into()),
    };
    let batch = raw.into_batch()?;
    info!(
        rows = batch.num_rows(),
        columns = batch.num_columns(),
        "loaded"
    );
    Ok(batch)
}

/// Set `column` to `value` on every row, replacing a same-named column.
pub fn tag_source(batch: &RecordBatch, column: &str, value: &str) -> Result<RecordBatch> {
    let tags = StringArray::from(vec![value; batch.num_rows()]);
    upsert_column(batch, column, Arc::new(tags))
}

/// File name up to its first `.`: `ABC_jane.export.csv` → `ABC_jane`.
pub fn source_stem(path: &Path) -> String {
    let name = source_name(path);
    name.split('.').next().unwrap_or_default().to_string()
}

/// The full file name.
pub fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
