// src/combine/file_combiner.rs

use anyhow::Result;
use std::{fmt, path::Path, str::FromStr, time::Instant};
use tracing::{info, warn};

use super::CombineReport;
use crate::{
    config::FileCombinerConfig,
    discover,
    error::CombineError,
    load::{self, source_name},
    table::concat_tables,
    write,
};

/// Provenance column added by this pipeline.
pub const FILENAME_COLUMN: &str = "filename";

/// Which files the user asked to combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Csv,
    Excel,
}

impl FileType {
    pub fn extension(self) -> &'static str {
        match self {
            FileType::Csv => ".csv",
            FileType::Excel => ".xlsx",
        }
    }
}

impl FromStr for FileType {
    type Err = CombineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(FileType::Csv),
            "excel" => Ok(FileType::Excel),
            _ => Err(CombineError::InvalidFileType(s.trim().to_string())),
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileType::Csv => write!(f, "CSV"),
            FileType::Excel => write!(f, "EXCEL"),
        }
    }
}

/// Combine every `.csv` or `.xlsx` in `input_folder` into one CSV at `output_file`,
/// adding a `filename` column. Files that fail to load are reported and skipped.
#[tracing::instrument(level = "info", skip(input_folder, output_file), fields(input = %input_folder.display()))]
pub fn combine_files_with_filenames(
    input_folder: &Path,
    file_type: &str,
    output_file: &Path,
) -> Result<CombineReport> {
    let start = Instant::now();
    if !input_folder.is_dir() {
        return Err(CombineError::FolderNotFound(input_folder.to_path_buf()).into());
    }
    let file_type: FileType = file_type.parse()?;

    let mut report = CombineReport {
        output: output_file.to_path_buf(),
        ..Default::default()
    };
    let mut tables = Vec::new();

    for path in discover::files_with_extension(input_folder, file_type.extension())? {
        let name = source_name(&path);
        match load::load_table(&path, 0).and_then(|b| load::tag_source(&b, FILENAME_COLUMN, &name))
        {
            Ok(batch) => {
                info!("Successfully processed {}", name);
                tables.push(batch);
                report.files_combined.push(path);
            }
            Err(e) => {
                warn!("Error processing {}: {:#}", name, e);
                report.files_skipped.push((path, format!("{:#}", e)));
            }
        }
    }

    if tables.is_empty() {
        return Err(CombineError::NoFilesLoaded(file_type.to_string()).into());
    }

    let combined = concat_tables(&tables)?;
    write::write_csv(&combined, output_file).map_err(|e| {
        anyhow::Error::from(CombineError::WriteFailed {
            path: output_file.to_path_buf(),
            reason: format!("{:#}", e),
        })
    })?;
    report.rows_written = combined.num_rows();

    info!(
        files = report.files_combined.len(),
        skipped = report.files_skipped.len(),
        rows = report.rows_written,
        elapsed = ?start.elapsed(),
        "All files successfully combined into '{}'",
        output_file.display()
    );
    Ok(report)
}

/// Run with folder and output taken from `config`.
pub fn run(config: &FileCombinerConfig, file_type: &str) -> Result<CombineReport> {
    combine_files_with_filenames(&config.input_folder, file_type, &config.output_file)
}
