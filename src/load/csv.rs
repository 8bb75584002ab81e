use anyhow::{anyhow, Context, Result};
use csv::ReaderBuilder;
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};
use tracing::debug;

use super::raw_table::RawTable;
use crate::error::CombineError;

/// Read a CSV file, skipping `skip_rows` leading lines before the header.
#[tracing::instrument(level = "debug", skip(path), fields(path = %path.display()))]
pub fn read_csv_table(path: &Path, skip_rows: usize) -> Result<RawTable> {
    let file = File::open(path).with_context(|| format!("Failed to open CSV file: {:?}", path))?;
    match read_csv_from(file, skip_rows)? {
        Some(table) => Ok(table),
        None => Err(CombineError::EmptyFile(path.to_path_buf()).into()),
    }
}

/// Parse CSV from any reader. `Ok(None)` means nothing was left for a header.
///
/// The first `skip_rows` physical lines are dropped before parsing, blank
/// ones included. Records shorter than the header are padded with nulls.
/// Longer records are accepted only when the surplus fields are empty
/// (trailing delimiters).
pub fn read_csv_from<R: Read>(reader: R, skip_rows: usize) -> Result<Option<RawTable>> {
    let mut reader = BufReader::new(reader);
    if !skip_lines(&mut reader, skip_rows)? {
        return Ok(None);
    }

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut records = rdr.records();

    let header = match records.next() {
        Some(rec) => rec.context("CSV parse error in header")?,
        None => return Ok(None),
    };
    let mut table = RawTable::new(header.iter().map(str::to_string).collect());
    let width = table.width();

    for (idx, result) in records.enumerate() {
        let record = result.with_context(|| format!("CSV parse error at data record {}", idx))?;
        if record.len() > width && record.iter().skip(width).any(|f| !f.is_empty()) {
            return Err(anyhow!(
                "expected {} fields in data record {}, saw {}",
                width,
                idx,
                record.len()
            ));
        }
        table.push_row(record.iter().map(|f| Some(f.to_string())).collect());
    }

    debug!(columns = width, rows = table.rows.len(), "parsed csv");
    Ok(Some(table))
}

/// Consume `n` lines up to and including each `\n`. `false` on early EOF.
fn skip_lines<R: BufRead>(reader: &mut R, n: usize) -> Result<bool> {
    let mut buf = Vec::new();
    for idx in 0..n {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .with_context(|| format!("Failed to read skipped line {}", idx))?;
        if read == 0 {
            return Ok(false);
        }
    }
    Ok(true)
}
