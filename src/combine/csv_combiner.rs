// src/combine/csv_combiner.rs
//
// Folder of CSV exports → one Excel workbook. Every file is read after
// skipping its leading metadata rows, tagged with its stem, stacked, then
// reshaped by `transform::process_table`. Any failure aborts the run.

use anyhow::{Context, Result};
use arrow::record_batch::RecordBatch;
use std::{path::PathBuf, time::Instant};
use tracing::info;

use super::CombineReport;
use crate::{
    config::CsvCombinerConfig,
    discover,
    error::CombineError,
    load::{self, source_stem},
    table::concat_tables,
    transform::{self, SOURCE_FILE_COLUMN},
    write,
};

pub fn get_file_paths(config: &CsvCombinerConfig) -> Result<Vec<PathBuf>> {
    discover::csv_files_in(&config.input_folder)
}

/// Load every CSV, tag it with `Source_File`, and stack the lot.
pub fn read_and_combine(config: &CsvCombinerConfig) -> Result<(RecordBatch, Vec<PathBuf>)> {
    let paths = get_file_paths(config)?;
    if paths.is_empty() {
        return Err(CombineError::NoFilesFound {
            kind: "CSV".into(),
            folder: config.input_folder.clone(),
        }
        .into());
    }

    let mut tables = Vec::with_capacity(paths.len());
    for path in &paths {
        let batch = load::load_table(path, config.skip_rows)
            .with_context(|| format!("reading {}", path.display()))?;
        tables.push(load::tag_source(&batch, SOURCE_FILE_COLUMN, &source_stem(path))?);
    }

    Ok((concat_tables(&tables)?, paths))
}

pub fn process(batch: &RecordBatch) -> Result<RecordBatch> {
    transform::process_table(batch)
}

pub fn save_to_excel(config: &CsvCombinerConfig, batch: &RecordBatch) -> Result<()> {
    write::write_excel(batch, &config.output_file).map_err(|e| {
        anyhow::Error::from(CombineError::WriteFailed {
            path: config.output_file.clone(),
            reason: format!("{:#}", e),
        })
    })
}

/// Read, combine, process and save. The caller reports any error.
#[tracing::instrument(level = "info", skip(config), fields(input = %config.input_folder.display()))]
pub fn execute(config: &CsvCombinerConfig) -> Result<CombineReport> {
    let start = Instant::now();
    let (combined, files) = read_and_combine(config)?;
    let processed = process(&combined)?;
    save_to_excel(config, &processed)?;

    info!(
        files = files.len(),
        rows = processed.num_rows(),
        elapsed = ?start.elapsed(),
        "Data successfully saved to {}",
        config.output_file.display()
    );
    Ok(CombineReport {
        files_combined: files,
        files_skipped: Vec::new(),
        rows_written: processed.num_rows(),
        output: config.output_file.clone(),
    })
}
