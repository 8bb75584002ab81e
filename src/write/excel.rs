use anyhow::{anyhow, Context, Result};
use arrow::{
    array::{Array, ArrayRef, AsArray},
    datatypes::{DataType, Float64Type, Int64Type},
    record_batch::RecordBatch,
    util::display::{ArrayFormatter, FormatOptions},
};
use rust_xlsxwriter::{Format, FormatBorder, Workbook, Worksheet};
use std::path::Path;
use tracing::info;

/// Worksheet limits, header row included.
pub const MAX_ROWS: usize = 1_048_576;
pub const MAX_COLUMNS: usize = 16_384;

/// Write `batch` to a single-sheet workbook: a bold header row, then one row
/// per record. Numbers are written as numbers, nulls as empty cells.
#[tracing::instrument(level = "info", skip(batch, path), fields(path = %path.display()))]
pub fn write_excel(batch: &RecordBatch, path: &Path) -> Result<()> {
    if batch.num_rows() + 1 > MAX_ROWS || batch.num_columns() > MAX_COLUMNS {
        return Err(anyhow!(
            "{} rows x {} columns does not fit in a worksheet",
            batch.num_rows(),
            batch.num_columns()
        ));
    }

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold().set_border(FormatBorder::Thin);
    let sheet = workbook.add_worksheet();

    let schema = batch.schema();
    for (i, field) in schema.fields().iter().enumerate() {
        let col = i as u16;
        sheet
            .write_string_with_format(0, col, field.name(), &header_format)
            .with_context(|| format!("writing header '{}'", field.name()))?;
        write_column(sheet, col, batch.column(i))
            .with_context(|| format!("writing column '{}'", field.name()))?;
    }

    workbook
        .save(path)
        .with_context(|| format!("saving workbook {}", path.display()))?;
    info!(rows = batch.num_rows(), columns = batch.num_columns(), "wrote workbook");
    Ok(())
}

fn write_column(sheet: &mut Worksheet, col: u16, array: &ArrayRef) -> Result<()> {
    match array.data_type() {
        DataType::Int64 => {
            for (row, v) in array.as_primitive::<Int64Type>().iter().enumerate() {
                if let Some(v) = v {
                    sheet.write_number(row as u32 + 1, col, v as f64)?;
                }
            }
        }
        DataType::Float64 => {
            for (row, v) in array.as_primitive::<Float64Type>().iter().enumerate() {
                match v {
                    Some(v) if v.is_finite() => {
                        sheet.write_number(row as u32 + 1, col, v)?;
                    }
                    Some(v) => {
                        sheet.write_string(row as u32 + 1, col, v.to_string())?;
                    }
                    None => {}
                }
            }
        }
        DataType::Utf8 => {
            for (row, v) in array.as_string::<i32>().iter().enumerate() {
                if let Some(v) = v {
                    sheet.write_string(row as u32 + 1, col, v)?;
                }
            }
        }
        _ => {
            let formatter = ArrayFormatter::try_new(array.as_ref(), &FormatOptions::default())?;
            for row in 0..array.len() {
                if array.is_valid(row) {
                    sheet.write_string(row as u32 + 1, col, formatter.value(row).to_string())?;
                }
            }
        }
    }
    Ok(())
}
