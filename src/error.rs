// src/error.rs

use std::path::PathBuf;

use thiserror::Error;

/// The failure kinds a combine run reports by name.
///
/// Anything else (I/O, parse and writer errors) travels as `anyhow::Error`
/// with context naming the file involved.
#[derive(Debug, Error)]
pub enum CombineError {
    #[error("the folder '{}' does not exist", .0.display())]
    FolderNotFound(PathBuf),
    #[error("no {kind} files found in '{}'", .folder.display())]
    NoFilesFound { kind: String, folder: PathBuf },
    #[error("invalid file type '{0}'; please choose 'excel' or 'csv'")]
    InvalidFileType(String),
    #[error("unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("'{}' has no header row", .0.display())]
    EmptyFile(PathBuf),
    #[error("no tables to combine")]
    NoTables,
    #[error("no supported {0} files found to combine")]
    NoFilesLoaded(String),
    #[error("error saving the combined file '{}': {reason}", .path.display())]
    WriteFailed { path: PathBuf, reason: String },
    #[error("configuration error: {0}")]
    Config(String),
}
