use anyhow::{Context, Result};
use arrow::{csv::WriterBuilder, record_batch::RecordBatch};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};
use tracing::info;

/// Write `batch` as CSV with a header row. Nulls become empty fields.
#[tracing::instrument(level = "info", skip(batch, path), fields(path = %path.display()))]
pub fn write_csv(batch: &RecordBatch, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating file {}", path.display()))?;
    let mut out = BufWriter::new(file);
    {
        // the csv writer flushes its own buffer into `out` on drop
        let mut writer = WriterBuilder::new().with_header(true).build(&mut out);
        writer.write(batch).context("writing CSV rows")?;
    }
    out.flush().context("flushing CSV output")?;

    info!(rows = batch.num_rows(), columns = batch.num_columns(), "wrote csv");
    Ok(())
}
