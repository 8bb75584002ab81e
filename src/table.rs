// src/table.rs

use anyhow::{Context, Result};
use arrow::{
    array::{new_null_array, ArrayRef},
    compute::{cast, concat_batches},
    datatypes::{DataType, Field, Schema, SchemaRef},
    record_batch::{RecordBatch, RecordBatchOptions},
};
use std::{collections::HashMap, sync::Arc};
use tracing::debug;

use crate::error::CombineError;

/// Type a column takes when two tables disagree about it.
fn merge_types(a: &DataType, b: &DataType) -> DataType {
    match (a, b) {
        _ if a == b => a.clone(),
        (DataType::Null, other) | (other, DataType::Null) => other.clone(),
        (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
            DataType::Float64
        }
        _ => DataType::Utf8,
    }
}

/// Union of all fields, in order of first appearance. Columns that are null
/// in every table come out as `Utf8`.
pub fn union_schema(batches: &[RecordBatch]) -> Schema {
    let mut order: Vec<(String, DataType)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for batch in batches {
        for field in batch.schema().fields() {
            match index.get(field.name()) {
                Some(&i) => {
                    let merged = merge_types(&order[i].1, field.data_type());
                    order[i].1 = merged;
                }
                None => {
                    index.insert(field.name().clone(), order.len());
                    order.push((field.name().clone(), field.data_type().clone()));
                }
            }
        }
    }

    let fields: Vec<Field> = order
        .into_iter()
        .map(|(name, ty)| {
            let ty = if ty == DataType::Null { DataType::Utf8 } else { ty };
            Field::new(name, ty, true)
        })
        .collect();
    Schema::new(fields)
}

/// Reshape `batch` to `schema`: cast the columns it has, null-fill the rest.
pub fn align_to_schema(batch: &RecordBatch, schema: &SchemaRef) -> Result<RecordBatch> {
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());
    for field in schema.fields() {
        let col = match batch.column_by_name(field.name()) {
            Some(arr) if arr.data_type() == field.data_type() => arr.clone(),
            Some(arr) => cast(arr, field.data_type())
                .with_context(|| format!("casting column '{}'", field.name()))?,
            None => new_null_array(field.data_type(), batch.num_rows()),
        };
        columns.push(col);
    }
    let options = RecordBatchOptions::new().with_row_count(Some(batch.num_rows()));
    RecordBatch::try_new_with_options(schema.clone(), columns, &options)
        .context("aligning table to combined schema")
}

/// Stack tables vertically over the union of their columns.
pub fn concat_tables(batches: &[RecordBatch]) -> Result<RecordBatch> {
    if batches.is_empty() {
        return Err(CombineError::NoTables.into());
    }

    let schema: SchemaRef = Arc::new(union_schema(batches));
    let aligned = batches
        .iter()
        .map(|b| align_to_schema(b, &schema))
        .collect::<Result<Vec<_>>>()?;

    let combined = concat_batches(&schema, &aligned).context("concatenating tables")?;
    debug!(
        tables = batches.len(),
        rows = combined.num_rows(),
        columns = combined.num_columns(),
        "concatenated"
    );
    Ok(combined)
}

/// Replace the column called `name` in place, or append it at the end.
pub fn upsert_column(batch: &RecordBatch, name: &str, array: ArrayRef) -> Result<RecordBatch> {
    let schema = batch.schema();
    let mut fields: Vec<Field> = schema.fields().iter().map(|f| f.as_ref().clone()).collect();
    let mut columns: Vec<ArrayRef> = batch.columns().to_vec();
    let field = Field::new(name, array.data_type().clone(), true);

    match schema.index_of(name) {
        Ok(i) => {
            fields[i] = field;
            columns[i] = array;
        }
        Err(_) => {
            fields.push(field);
            columns.push(array);
        }
    }

    let options = RecordBatchOptions::new().with_row_count(Some(batch.num_rows()));
    RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), columns, &options)
        .with_context(|| format!("setting column '{}'", name))
}

/// Drop the column called `name`; a missing column leaves the table as is.
pub fn drop_column(batch: &RecordBatch, name: &str) -> RecordBatch {
    let mut out = batch.clone();
    if let Ok(i) = batch.schema().index_of(name) {
        out.remove_column(i);
    }
    out
}
