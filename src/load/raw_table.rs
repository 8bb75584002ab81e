use anyhow::Result;
use arrow::{
    array::{ArrayRef, Float64Array, Int64Array, NullArray, StringArray},
    datatypes::{DataType, Field, Schema},
    record_batch::{RecordBatch, RecordBatchOptions},
};
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use super::infer::{infer_column_type, is_na};

/// A parsed sheet before column typing: one header row plus the data rows
/// beneath it, each cell either text or missing.
#[derive(Debug, Default)]
pub struct RawTable {
    /// Column names after blank-filling and de-duplication.
    pub headers: Vec<String>,
    /// One entry per header in every row; short rows are padded with `None`.
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn new(raw_headers: Vec<String>) -> Self {
        Self {
            headers: normalize_headers(raw_headers),
            rows: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// Push a row, mapping NA markers to `None` and padding to the header width.
    /// Callers reject rows wider than the header before getting here.
    pub fn push_row(&mut self, cells: Vec<Option<String>>) {
        let width = self.width();
        let mut row: Vec<Option<String>> = cells
            .into_iter()
            .take(width)
            .map(|c| c.filter(|s| !is_na(s)))
            .collect();
        row.resize(width, None);
        self.rows.push(row);
    }

    /// Type each column and build a `RecordBatch`.
    pub fn into_batch(self) -> Result<RecordBatch> {
        let num_rows = self.rows.len();
        let mut columns: Vec<Vec<Option<String>>> = vec![Vec::with_capacity(num_rows); self.width()];
        for row in self.rows {
            for (col, cell) in columns.iter_mut().zip(row) {
                col.push(cell);
            }
        }

        let mut fields = Vec::with_capacity(self.headers.len());
        let mut arrays = Vec::with_capacity(self.headers.len());
        for (name, values) in self.headers.iter().zip(columns) {
            let ty = infer_column_type(&values);
            arrays.push(build_array(&values, &ty));
            fields.push(Field::new(name, ty, true));
        }

        let options = RecordBatchOptions::new().with_row_count(Some(num_rows));
        let batch =
            RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), arrays, &options)?;
        Ok(batch)
    }
}

fn build_array(values: &[Option<String>], ty: &DataType) -> ArrayRef {
    match ty {
        DataType::Int64 => Arc::new(
            values
                .iter()
                .map(|v| v.as_deref().and_then(|s| s.trim().parse::<i64>().ok()))
                .collect::<Int64Array>(),
        ),
        DataType::Float64 => Arc::new(
            values
                .iter()
                .map(|v| v.as_deref().and_then(|s| s.trim().parse::<f64>().ok()))
                .collect::<Float64Array>(),
        ),
        DataType::Null => Arc::new(NullArray::new(values.len())),
        _ => Arc::new(values.iter().map(|v| v.as_deref()).collect::<StringArray>()),
    }
}

/// Blank names become `Unnamed: <i>`; repeats of `x` become `x.1`, `x.2`, ...
fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let named: Vec<String> = raw
        .into_iter()
        .enumerate()
        .map(|(i, h)| {
            if h.trim().is_empty() {
                format!("Unnamed: {}", i)
            } else {
                h
            }
        })
        .collect();

    let mut taken: HashSet<String> = named.iter().cloned().collect();
    let mut seen: HashSet<String> = HashSet::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(named.len());

    for name in named {
        if seen.insert(name.clone()) {
            out.push(name);
            continue;
        }
        let mut n = counts.get(&name).copied().unwrap_or(1);
        let mut candidate = format!("{}.{}", name, n);
        while taken.contains(&candidate) {
            n += 1;
            candidate = format!("{}.{}", name, n);
        }
        counts.insert(name, n + 1);
        taken.insert(candidate.clone());
        seen.insert(candidate.clone());
        out.push(candidate);
    }
    out
}
