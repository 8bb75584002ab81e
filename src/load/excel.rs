use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveDateTime;
use std::path::Path;
use tracing::debug;

use super::raw_table::RawTable;
use crate::error::CombineError;

/// Read the first worksheet of a workbook, skipping `skip_rows` rows before
/// the header.
#[tracing::instrument(level = "debug", skip(path), fields(path = %path.display()))]
pub fn read_excel_table(path: &Path, skip_rows: usize) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook: {:?}", path))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| CombineError::EmptyFile(path.to_path_buf()))?
        .with_context(|| format!("Failed to read first worksheet of {:?}", path))?;

    let mut rows = range.rows().skip(skip_rows);
    let header = rows
        .next()
        .ok_or_else(|| CombineError::EmptyFile(path.to_path_buf()))?;
    let mut table = RawTable::new(
        header
            .iter()
            .map(|c| cell_text(c).unwrap_or_default())
            .collect(),
    );

    for row in rows {
        table.push_row(row.iter().map(cell_text).collect());
    }

    debug!(columns = table.width(), rows = table.rows.len(), "parsed worksheet");
    Ok(table)
}

/// Text form of a cell, `None` for empty and error cells.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(format_float(*f)),
        Data::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
        Data::DateTime(dt) => dt.as_datetime().map(format_datetime),
        other => Some(other.to_string()),
    }
}

fn format_datetime(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Spreadsheets store every number as a float; whole values read back as
/// integers so `3` stays `3` rather than `3.0`.
fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        format!("{:?}", f)
    }
}
