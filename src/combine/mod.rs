// src/combine/mod.rs
use std::path::PathBuf;

pub mod csv_combiner;
pub mod file_combiner;

pub use file_combiner::{combine_files_with_filenames, FileType};

/// What a finished run did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombineReport {
    /// Files whose rows made it into the output, in combine order.
    pub files_combined: Vec<PathBuf>,
    /// Files that failed to load, with the error text.
    pub files_skipped: Vec<(PathBuf, String)>,
    pub rows_written: usize,
    pub output: PathBuf,
}
