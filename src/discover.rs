// src/discover.rs

use anyhow::{Context, Result};
use glob::{glob_with, MatchOptions, Pattern};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::error::CombineError;

/// All `*.csv` directly inside `folder`, sorted by path.
///
/// Dotfiles are not matched. A folder that does not exist simply matches
/// nothing.
pub fn csv_files_in(folder: &Path) -> Result<Vec<PathBuf>> {
    let escaped = Pattern::escape(&folder.to_string_lossy());
    let pattern = Path::new(&escaped).join("*.csv").to_string_lossy().into_owned();
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };
    let mut paths: Vec<PathBuf> = glob_with(&pattern, options)
        .with_context(|| format!("Failed to read glob pattern '{}'", pattern))?
        .filter_map(|entry| entry.ok())
        .filter(|p| p.is_file())
        .collect();
    paths.sort();
    debug!(pattern = %pattern, found = paths.len(), "globbed csv files");
    Ok(paths)
}

/// Regular files directly inside `folder` whose name ends with `extension`
/// (case-sensitive), sorted by path.
pub fn files_with_extension(folder: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(CombineError::FolderNotFound(folder.to_path_buf()).into());
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(folder)
        .with_context(|| format!("listing folder {}", folder.display()))?
    {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.ends_with(extension));
        if matches {
            paths.push(path);
        }
    }
    paths.sort();
    debug!(folder = %folder.display(), extension, found = paths.len(), "listed files");
    Ok(paths)
}
