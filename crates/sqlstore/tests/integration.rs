use sqlstore::{
    describe_store, execute, list_datasets, replace_dataset, ExecMode, ScalarValue, Store, StoreError,
    SAMPLE_ROWS,
};
use tabular::{Cell, Frame};

fn sales_frame() -> Frame {
    let header = vec!["Region".to_string(), "Units Sold".to_string()];
    let rows = vec![
        vec![Cell::Text("East".into()), Cell::Integer(10)],
        vec![Cell::Text("West".into()), Cell::Integer(7)],
        vec![Cell::Text("North".into()), Cell::Integer(12)],
        vec![Cell::Text("South".into()), Cell::Null],
    ];
    Frame::from_raw(&header, rows).unwrap()
}

#[tokio::test]
async fn test_replace_dataset_and_query() {
    let store = Store::in_memory().await.unwrap();
    let n = replace_dataset(&store, "sales_q1", &sales_frame()).await.unwrap();
    assert_eq!(n, 4);

    let rs = execute(
        &store,
        "SELECT region, units_sold FROM sales_q1 ORDER BY units_sold DESC LIMIT 2",
        ExecMode::Verbatim,
    )
    .await
    .unwrap();

    assert_eq!(rs.columns, vec!["region", "units_sold"]);
    assert_eq!(
        rs.rows,
        vec![
            vec![ScalarValue::Text("North".into()), ScalarValue::Integer(12)],
            vec![ScalarValue::Text("East".into()), ScalarValue::Integer(10)],
        ]
    );
    for row in &rs.rows {
        assert_eq!(row.len(), rs.columns.len());
    }
}

#[tokio::test]
async fn test_replace_twice_is_not_append() {
    let store = Store::in_memory().await.unwrap();
    let first = replace_dataset(&store, "sales_q1", &sales_frame()).await.unwrap();
    let second = replace_dataset(&store, "sales_q1", &sales_frame()).await.unwrap();
    assert_eq!(first, second);

    let rs = execute(&store, "SELECT COUNT(*) AS n FROM sales_q1", ExecMode::Verbatim)
        .await
        .unwrap();
    assert_eq!(rs.rows[0][0], ScalarValue::Integer(4));
    assert_eq!(list_datasets(&store).await.unwrap(), vec!["sales_q1"]);
}

#[tokio::test]
async fn test_replace_changes_columns() {
    let store = Store::in_memory().await.unwrap();
    replace_dataset(&store, "t", &sales_frame()).await.unwrap();

    let other = Frame::from_raw(&["Price".to_string()], vec![vec![Cell::Real(1.5)]]).unwrap();
    replace_dataset(&store, "t", &other).await.unwrap();

    let schema = describe_store(&store).await.unwrap();
    assert_eq!(schema.get("t").unwrap().columns, vec!["price"]);
}

#[tokio::test]
async fn test_replace_rejects_empty_name() {
    let store = Store::in_memory().await.unwrap();
    let err = replace_dataset(&store, "", &sales_frame()).await;
    assert!(matches!(err, Err(StoreError::InvalidDataset(_))));
}

#[tokio::test]
async fn test_describe_empty_store() {
    let store = Store::in_memory().await.unwrap();
    let schema = describe_store(&store).await.unwrap();
    assert!(schema.is_empty());
    assert_eq!(serde_json::to_string(&schema).unwrap(), "{}");
}

#[tokio::test]
async fn test_describe_caps_sample_rows() {
    let store = Store::in_memory().await.unwrap();

    let rows = (0..25).map(|i| vec![Cell::Integer(i)]).collect();
    let big = Frame::from_raw(&["id".to_string()], rows).unwrap();
    replace_dataset(&store, "big", &big).await.unwrap();
    replace_dataset(&store, "sales_q1", &sales_frame()).await.unwrap();

    let schema = describe_store(&store).await.unwrap();
    assert_eq!(schema.len(), 2);
    for (_, table) in schema.tables() {
        assert!(table.sample_data.len() <= SAMPLE_ROWS);
    }
    assert_eq!(schema.get("big").unwrap().sample_data.len(), SAMPLE_ROWS);
    assert_eq!(schema.get("sales_q1").unwrap().columns, vec!["region", "units_sold"]);
}

#[tokio::test]
async fn test_missing_table_reports_statement() {
    let store = Store::in_memory().await.unwrap();
    let sql = "SELECT * FROM no_such_table";
    let failure = execute(&store, sql, ExecMode::Verbatim).await.unwrap_err();
    assert_eq!(failure.sql, sql);
    assert!(failure.message.contains("no_such_table"));
}

#[tokio::test]
async fn test_empty_result_still_has_columns() {
    let store = Store::in_memory().await.unwrap();
    replace_dataset(&store, "sales_q1", &sales_frame()).await.unwrap();

    let rs = execute(&store, "SELECT region FROM sales_q1 WHERE 1 = 0", ExecMode::Verbatim)
        .await
        .unwrap();
    assert_eq!(rs.columns, vec!["region"]);
    assert!(rs.rows.is_empty());
}

#[tokio::test]
async fn test_mixed_value_classes() {
    let store = Store::in_memory().await.unwrap();
    let rs = execute(
        &store,
        "SELECT 1 AS i, 2.5 AS r, 'x' AS t, NULL AS n, X'0aff' AS b",
        ExecMode::Verbatim,
    )
    .await
    .unwrap();
    assert_eq!(
        rs.rows[0],
        vec![
            ScalarValue::Integer(1),
            ScalarValue::Real(2.5),
            ScalarValue::Text("x".into()),
            ScalarValue::Null,
            ScalarValue::Blob(vec![0x0a, 0xff]),
        ]
    );
}

#[tokio::test]
async fn test_verbatim_mode_allows_writes() {
    let store = Store::in_memory().await.unwrap();
    replace_dataset(&store, "sales_q1", &sales_frame()).await.unwrap();

    execute(&store, "DROP TABLE sales_q1", ExecMode::Verbatim).await.unwrap();
    assert!(list_datasets(&store).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_read_only_mode_refuses_writes() {
    let store = Store::in_memory().await.unwrap();
    replace_dataset(&store, "sales_q1", &sales_frame()).await.unwrap();

    let failure = execute(&store, "DROP TABLE sales_q1", ExecMode::ReadOnly)
        .await
        .unwrap_err();
    assert_eq!(failure.sql, "DROP TABLE sales_q1");
    assert_eq!(list_datasets(&store).await.unwrap(), vec!["sales_q1"]);

    // the pooled connection is usable for writes again afterwards
    replace_dataset(&store, "sales_q1", &sales_frame()).await.unwrap();

    let rs = execute(&store, "SELECT COUNT(*) FROM sales_q1", ExecMode::ReadOnly)
        .await
        .unwrap();
    assert_eq!(rs.rows[0][0], ScalarValue::Integer(4));
}

#[tokio::test]
async fn test_file_store_persists_across_handles() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("database.db");

    {
        let store = Store::open(&path).await.unwrap();
        replace_dataset(&store, "sales_q1", &sales_frame()).await.unwrap();
        store.close().await;
    }

    let store = Store::open(&path).await.unwrap();
    store.ping().await.unwrap();
    assert_eq!(list_datasets(&store).await.unwrap(), vec!["sales_q1"]);
}

#[tokio::test]
async fn test_tables_starting_with_sqlite_are_listed() {
    let store = Store::in_memory().await.unwrap();
    replace_dataset(&store, "sqlitereport", &sales_frame()).await.unwrap();
    replace_dataset(&store, "sqlite3_export", &sales_frame()).await.unwrap();
    replace_dataset(&store, "sales", &sales_frame()).await.unwrap();

    assert_eq!(
        list_datasets(&store).await.unwrap(),
        vec!["sales", "sqlite3_export", "sqlitereport"]
    );

    let schema = describe_store(&store).await.unwrap();
    assert_eq!(schema.len(), 3);
    assert!(schema.get("sqlitereport").is_some());
}

#[tokio::test]
async fn test_abandoned_read_only_statement_leaves_store_writable() {
    let store = Store::in_memory().await.unwrap();
    replace_dataset(&store, "sales_q1", &sales_frame()).await.unwrap();

    let slow = "WITH RECURSIVE c(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM c WHERE x < 5000000) \
                SELECT COUNT(*) FROM c";
    let abandoned = tokio::time::timeout(
        std::time::Duration::from_millis(50),
        execute(&store, slow, ExecMode::ReadOnly),
    )
    .await;
    assert!(abandoned.is_err());

    // same single pooled connection, must accept writes again
    let n = replace_dataset(&store, "sales_q1", &sales_frame()).await.unwrap();
    assert_eq!(n, 4);
    execute(&store, "DELETE FROM sales_q1 WHERE region = 'East'", ExecMode::Verbatim)
        .await
        .unwrap();
}
