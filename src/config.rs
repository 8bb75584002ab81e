// src/config.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::error::CombineError;

/// Rows skipped at the top of every CSV before the header (pipeline 1).
pub const DEFAULT_SKIP_ROWS: usize = 2;
/// Output name used by the file combiner when none is configured.
pub const DEFAULT_OUTPUT_FILE: &str = "combined_data.csv";
/// Env var naming the YAML config file.
pub const CONFIG_ENV: &str = "COMBINER_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "combiner.yaml";

fn default_skip_rows() -> usize {
    DEFAULT_SKIP_ROWS
}

fn default_output_file() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_FILE)
}

/// Settings for the CSV → Excel combiner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvCombinerConfig {
    /// Folder scanned (non-recursively) for `*.csv`.
    pub input_folder: PathBuf,
    /// Destination workbook.
    pub output_file: PathBuf,
    #[serde(default = "default_skip_rows")]
    pub skip_rows: usize,
}

impl CsvCombinerConfig {
    pub fn new(input_folder: impl Into<PathBuf>, output_file: impl Into<PathBuf>) -> Self {
        Self {
            input_folder: input_folder.into(),
            output_file: output_file.into(),
            skip_rows: DEFAULT_SKIP_ROWS,
        }
    }

    pub fn with_skip_rows(mut self, skip_rows: usize) -> Self {
        self.skip_rows = skip_rows;
        self
    }

    /// Build from `<INPUT_DIR> <OUTPUT_XLSX> [SKIP_ROWS]`.
    /// Returns `Ok(None)` when no arguments were given.
    pub fn from_args(args: &[String]) -> Result<Option<Self>> {
        match args {
            [] => Ok(None),
            [input, output] => Ok(Some(Self::new(input, output))),
            [input, output, skip] => {
                let skip_rows = skip.parse::<usize>().map_err(|_| {
                    CombineError::Config(format!("SKIP_ROWS must be a number, got '{}'", skip))
                })?;
                Ok(Some(Self::new(input, output).with_skip_rows(skip_rows)))
            }
            _ => Err(CombineError::Config(
                "usage: combine_csv <INPUT_DIR> <OUTPUT_XLSX> [SKIP_ROWS]".into(),
            )
            .into()),
        }
    }
}

/// Settings for the CSV/Excel → CSV combiner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCombinerConfig {
    pub input_folder: PathBuf,
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,
    /// `excel` or `csv`; prompted for on stdin when absent.
    #[serde(default)]
    pub file_type: Option<String>,
}

impl FileCombinerConfig {
    pub fn new(input_folder: impl Into<PathBuf>) -> Self {
        Self {
            input_folder: input_folder.into(),
            output_file: default_output_file(),
            file_type: None,
        }
    }

    pub fn with_output_file(mut self, output_file: impl Into<PathBuf>) -> Self {
        self.output_file = output_file.into();
        self
    }

    /// Build from `<INPUT_DIR> [OUTPUT_CSV]`.
    /// Returns `Ok(None)` when no arguments were given.
    pub fn from_args(args: &[String]) -> Result<Option<Self>> {
        match args {
            [] => Ok(None),
            [input] => Ok(Some(Self::new(input))),
            [input, output] => Ok(Some(Self::new(input).with_output_file(output))),
            _ => Err(CombineError::Config(
                "usage: filecombiner <INPUT_DIR> [OUTPUT_CSV]".into(),
            )
            .into()),
        }
    }
}

/// Top-level YAML document; each binary reads its own section.
///
/// ```yaml
/// csv_combiner:
///   input_folder: exports
///   output_file: combined.xlsx
///   skip_rows: 2
/// file_combiner:
///   input_folder: sheets
///   file_type: excel
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinerConfig {
    #[serde(default)]
    pub csv_combiner: Option<CsvCombinerConfig>,
    #[serde(default)]
    pub file_combiner: Option<FileCombinerConfig>,
}

impl CombinerConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("parsing combiner config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_yaml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// `$COMBINER_CONFIG`, falling back to `combiner.yaml` in the working dir.
    pub fn default_path() -> PathBuf {
        env::var(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE))
    }
}
