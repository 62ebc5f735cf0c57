use std::io::Write;

use proptest::prelude::*;
use tabular::{
    dataset_name_from_filename, normalize_column_name, read_path, Cell, ColumnType, SourceFormat,
    TabularError,
};

fn write_csv(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(body.as_bytes()).unwrap();
    path
}

#[test]
fn test_read_sales_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "sales_q1.csv", "Region,Units Sold\nEast,10\nWest,7\nNorth,\n");

    let format = SourceFormat::from_filename("sales_q1.csv").unwrap();
    let frame = read_path(&path, format).unwrap();

    assert_eq!(dataset_name_from_filename("sales_q1.csv"), "sales_q1");
    assert_eq!(frame.columns, vec!["region", "units_sold"]);
    assert_eq!(frame.row_count(), 3);
    assert_eq!(frame.rows[0], vec![Cell::Text("East".into()), Cell::Integer(10)]);
    assert_eq!(frame.rows[2][1], Cell::Null);
    assert_eq!(frame.column_types(), vec![ColumnType::Text, ColumnType::Integer]);
}

#[test]
fn test_csv_text_column_keeps_raw_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "codes.csv", "code,amount\n007,1.5\nA12,2\n");

    let frame = read_path(&path, SourceFormat::Csv).unwrap();
    assert_eq!(frame.rows[0][0], Cell::Text("007".into()));
    assert_eq!(frame.rows[1][1], Cell::Real(2.0));
    assert_eq!(frame.column_types(), vec![ColumnType::Text, ColumnType::Real]);
}

#[test]
fn test_csv_short_rows_padded() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "short.csv", "a,b,c\n1,2\n");

    let frame = read_path(&path, SourceFormat::Csv).unwrap();
    assert_eq!(frame.rows[0], vec![Cell::Integer(1), Cell::Integer(2), Cell::Null]);
}

#[test]
fn test_csv_long_rows_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "long.csv", "a\n1,2\n");

    assert!(matches!(read_path(&path, SourceFormat::Csv), Err(TabularError::Malformed(_))));
}

#[test]
fn test_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.csv");
    assert!(read_path(&missing, SourceFormat::Csv).is_err());
}

#[test]
fn test_excel_garbage_is_excel_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "fake.xlsx", "not a workbook");
    assert!(matches!(read_path(&path, SourceFormat::Excel), Err(TabularError::Excel(_))));
}

proptest! {
    #[test]
    fn prop_normalize_idempotent(raw in "[A-Za-z0-9 _.,;:!?()$%&#@\t-]{0,40}") {
        let once = normalize_column_name(&raw);
        prop_assert_eq!(normalize_column_name(&once), once);
    }

    #[test]
    fn prop_dataset_name_is_identifier(stem in "[A-Za-z0-9 _.()&-]{1,30}") {
        let filename = format!("{stem}.csv");
        let name = dataset_name_from_filename(&filename);
        prop_assert!(name.chars().all(|c| c.is_alphanumeric() || c == '_'));
        prop_assert!(!name.is_empty());
    }
}

#[test]
fn test_read_excel_fixture() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sales_q1.xlsx");
    let frame = read_path(&path, SourceFormat::from_filename("sales_q1.xlsx").unwrap()).unwrap();

    assert_eq!(frame.columns, vec!["region", "units_sold", "unit_price", "order_date"]);
    // the blank third sheet row is skipped
    assert_eq!(frame.row_count(), 2);
    assert_eq!(
        frame.rows[0],
        vec![
            Cell::Text("East".into()),
            Cell::Integer(10),
            Cell::Real(2.5),
            Cell::Text("2024-03-31 09:00:00".into()),
        ]
    );
    assert_eq!(
        frame.rows[1],
        vec![
            Cell::Text("West".into()),
            Cell::Integer(7),
            Cell::Integer(3),
            Cell::Text("2024-01-02 18:00:00".into()),
        ]
    );
    assert_eq!(
        frame.column_types(),
        vec![ColumnType::Text, ColumnType::Integer, ColumnType::Real, ColumnType::Text]
    );
}
