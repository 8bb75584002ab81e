// src/transform.rs

use anyhow::{Context, Result};
use arrow::{
    array::{ArrayRef, AsArray, StringArray},
    compute::cast,
    datatypes::DataType,
    record_batch::RecordBatch,
};
use std::sync::Arc;
use tracing::debug;

use crate::table::{drop_column, upsert_column};

pub const SOURCE_FILE_COLUMN: &str = "Source_File";
pub const COMPANY_ID_COLUMN: &str = "companyID";
pub const AUTHOR_NAME_COLUMN: &str = "author_name";
pub const STORY_URL_COLUMN: &str = "Story URL";
pub const CURATED_URL_COLUMN: &str = "Curated_URL";
pub const CURATED_URL_PREFIX: &str = "url:";

/// Column `name` as text, or `None` when the table has no such column.
fn text_column(batch: &RecordBatch, name: &str) -> Result<Option<StringArray>> {
    let Some(col) = batch.column_by_name(name) else {
        return Ok(None);
    };
    let text = cast(col, &DataType::Utf8).with_context(|| format!("reading '{}' as text", name))?;
    Ok(Some(text.as_string::<i32>().clone()))
}

/// Split `column` on its first `_` into `companyID` and `author_name`.
/// Values without an underscore keep the whole value as `companyID` and a
/// null `author_name`.
pub fn split_source_column(batch: &RecordBatch, column: &str) -> Result<RecordBatch> {
    let Some(source) = text_column(batch, column)? else {
        debug!(column, "no source column; skipping split");
        return Ok(batch.clone());
    };

    let (company, author): (Vec<Option<String>>, Vec<Option<String>>) = source
        .iter()
        .map(|v| match v {
            Some(s) => match s.split_once('_') {
                Some((c, a)) => (Some(c.to_string()), Some(a.to_string())),
                None => (Some(s.to_string()), None),
            },
            None => (None, None),
        })
        .unzip();

    let batch = upsert_column(
        batch,
        COMPANY_ID_COLUMN,
        Arc::new(StringArray::from(company)) as ArrayRef,
    )?;
    upsert_column(
        &batch,
        AUTHOR_NAME_COLUMN,
        Arc::new(StringArray::from(author)) as ArrayRef,
    )
}

/// Replace `Story URL` with `Curated_URL` = `url:` + value; nulls stay null.
pub fn curate_url_column(batch: &RecordBatch) -> Result<RecordBatch> {
    let Some(urls) = text_column(batch, STORY_URL_COLUMN)? else {
        debug!("no '{}' column; skipping url curation", STORY_URL_COLUMN);
        return Ok(batch.clone());
    };

    let curated: StringArray = urls
        .iter()
        .map(|v| v.map(|u| format!("{}{}", CURATED_URL_PREFIX, u)))
        .collect();
    let batch = upsert_column(batch, CURATED_URL_COLUMN, Arc::new(curated))?;
    Ok(drop_column(&batch, STORY_URL_COLUMN))
}

/// Derived columns for the CSV combiner. Each step is skipped when its input
/// column is absent.
pub fn process_table(batch: &RecordBatch) -> Result<RecordBatch> {
    let batch = split_source_column(batch, SOURCE_FILE_COLUMN)?;
    curate_url_column(&batch)
}
