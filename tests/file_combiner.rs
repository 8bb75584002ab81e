use anyhow::Result;
use filecombiner::{
    combine::{combine_files_with_filenames, file_combiner},
    CombineError, FileCombinerConfig,
};
use rust_xlsxwriter::Workbook;
use std::{fs, path::Path};
use tempfile::tempdir;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn init_test_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,filecombiner=debug")),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn read_rows(path: &Path) -> Vec<csv::StringRecord> {
    let mut rdr = csv::Reader::from_path(path).unwrap();
    rdr.records().map(|r| r.unwrap()).collect()
}

fn read_header(path: &Path) -> Vec<String> {
    let mut rdr = csv::Reader::from_path(path).unwrap();
    rdr.headers().unwrap().iter().map(str::to_string).collect()
}

fn write_workbook(path: &Path, rows: &[&[&str]]) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            sheet.write_string(r as u32, c as u16, *value)?;
        }
    }
    workbook.save(path)?;
    Ok(())
}

#[test]
fn combines_csv_files_with_full_filename() -> Result<()> {
    init_test_logging();
    let input = tempdir()?;
    fs::write(input.path().join("jan.csv"), "id,amount\n1,10\n2,20\n")?;
    fs::write(input.path().join("feb.csv"), "id,amount\n3,30\n")?;
    fs::write(input.path().join("notes.txt"), "ignored")?;
    let output = input.path().join("combined_data.csv");

    let report = combine_files_with_filenames(input.path(), "csv", &output)?;
    assert_eq!(report.files_combined.len(), 2);
    assert!(report.files_skipped.is_empty());
    assert_eq!(report.rows_written, 3);

    assert_eq!(read_header(&output), vec!["id", "amount", "filename"]);
    let rows = read_rows(&output);
    assert_eq!(rows.len(), 3);
    // sorted: feb.csv before jan.csv
    assert_eq!(&rows[0][2], "feb.csv");
    assert_eq!(&rows[1][2], "jan.csv");
    assert_eq!(&rows[2][2], "jan.csv");
    assert_eq!(&rows[0][0], "3");
    Ok(())
}

#[test]
fn combines_excel_files() -> Result<()> {
    init_test_logging();
    let input = tempdir()?;
    write_workbook(
        &input.path().join("north.xlsx"),
        &[&["region", "rep"], &["N", "ann"], &["N", "bo"]],
    )?;
    write_workbook(
        &input.path().join("south.xlsx"),
        &[&["region", "target"], &["S", "100"]],
    )?;
    fs::write(input.path().join("stray.csv"), "region\nW\n")?;
    let output = input.path().join("out.csv");

    let report = combine_files_with_filenames(input.path(), "Excel", &output)?;
    assert_eq!(report.rows_written, 3);

    assert_eq!(
        read_header(&output),
        vec!["region", "rep", "filename", "target"]
    );
    let rows = read_rows(&output);
    assert_eq!(&rows[0][2], "north.xlsx");
    assert_eq!(&rows[2][2], "south.xlsx");
    // south.xlsx has no `rep`, north.xlsx has no `target`
    assert_eq!(&rows[2][1], "");
    assert_eq!(&rows[0][3], "");
    assert_eq!(&rows[2][3], "100");
    Ok(())
}

#[test]
fn unreadable_file_is_skipped() -> Result<()> {
    init_test_logging();
    let input = tempdir()?;
    fs::write(input.path().join("a.csv"), "x\n1\n")?;
    fs::write(input.path().join("b.csv"), "x\n1,2,3\n")?;
    fs::write(input.path().join("c.csv"), "x\n2\n")?;
    let output = input.path().join("out.csv");

    let report = combine_files_with_filenames(input.path(), "csv", &output)?;
    assert_eq!(report.files_combined.len(), 2);
    assert_eq!(report.files_skipped.len(), 1);
    assert!(report.files_skipped[0].0.ends_with("b.csv"));
    assert_eq!(report.rows_written, 2);
    Ok(())
}

#[test]
fn all_files_failing_writes_nothing() -> Result<()> {
    init_test_logging();
    let input = tempdir()?;
    fs::write(input.path().join("broken.xlsx"), b"not a workbook")?;
    let output = input.path().join("out.csv");

    let err = combine_files_with_filenames(input.path(), "excel", &output).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CombineError>(),
        Some(CombineError::NoFilesLoaded(kind)) if kind == "EXCEL"
    ));
    assert!(!output.exists());
    Ok(())
}

#[test]
fn no_matching_files_writes_nothing() -> Result<()> {
    init_test_logging();
    let input = tempdir()?;
    let output = input.path().join("out.csv");

    let err = combine_files_with_filenames(input.path(), "csv", &output).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CombineError>(),
        Some(CombineError::NoFilesLoaded(_))
    ));
    assert!(!output.exists());
    Ok(())
}

#[test]
fn missing_folder_is_reported_before_file_type() {
    init_test_logging();
    let input = tempdir().unwrap();
    let missing = input.path().join("gone");
    let err = combine_files_with_filenames(&missing, "pdf", &input.path().join("o.csv"))
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CombineError>(),
        Some(CombineError::FolderNotFound(_))
    ));
}

#[test]
fn invalid_file_type_is_reported() {
    init_test_logging();
    let input = tempdir().unwrap();
    let err = combine_files_with_filenames(input.path(), "pdf", &input.path().join("o.csv"))
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CombineError>(),
        Some(CombineError::InvalidFileType(_))
    ));
}

#[test]
fn write_failure_is_reported() -> Result<()> {
    init_test_logging();
    let input = tempdir()?;
    fs::write(input.path().join("a.csv"), "x\n1\n")?;
    let output = input.path().join("missing-dir").join("out.csv");

    let err = combine_files_with_filenames(input.path(), "csv", &output).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CombineError>(),
        Some(CombineError::WriteFailed { .. })
    ));
    Ok(())
}

#[test]
fn run_uses_config_paths() -> Result<()> {
    init_test_logging();
    let input = tempdir()?;
    fs::write(input.path().join("only.csv"), "x\n1\n")?;
    let output = input.path().join("from-config.csv");

    let config = FileCombinerConfig::new(input.path()).with_output_file(&output);
    let report = file_combiner::run(&config, "csv")?;
    assert_eq!(report.output, output);
    assert!(output.exists());
    Ok(())
}

#[test]
fn integer_column_with_gaps_keeps_integer_text() -> Result<()> {
    init_test_logging();
    let input = tempdir()?;
    fs::write(input.path().join("a.csv"), "id,tag\n1,x\n,y\n")?;
    let output = input.path().join("out.csv");

    combine_files_with_filenames(input.path(), "csv", &output)?;
    let rows = read_rows(&output);
    assert_eq!(&rows[0][0], "1");
    assert_eq!(&rows[1][0], "");
    Ok(())
}
