use serde::Serialize;
use std::collections::BTreeMap;

use crate::exec::fetch_rows;
use crate::ingest::USER_TABLES_SQL;
use crate::{quote_ident, Result, ScalarValue, Store};

/// Rows sampled per table.
pub const SAMPLE_ROWS: usize = 10;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TableSchema {
    pub columns: Vec<String>,
    pub sample_data: Vec<Vec<ScalarValue>>,
}

/// Snapshot of the store: table name -> columns + sample rows.
/// Ordered by table name so anything rendered from it is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SchemaDescription(pub BTreeMap<String, TableSchema>);

impl SchemaDescription {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, table: &str) -> Option<&TableSchema> {
        self.0.get(table)
    }

    pub fn tables(&self) -> impl Iterator<Item = (&String, &TableSchema)> {
        self.0.iter()
    }

    pub fn insert(&mut self, table: impl Into<String>, schema: TableSchema) {
        self.0.insert(table.into(), schema);
    }
}

/// Read every table's columns (positional order) and up to
/// [`SAMPLE_ROWS`] rows. Read-only.
pub async fn describe_store(store: &Store) -> Result<SchemaDescription> {
    let mut conn = store.pool().acquire().await?;

    let tables = sqlx::query_scalar::<_, String>(USER_TABLES_SQL)
        .fetch_all(&mut *conn)
        .await?;

    let mut out = SchemaDescription::default();
    for table in tables {
        let columns = sqlx::query_scalar::<_, String>(
            "SELECT name FROM pragma_table_info(?1) ORDER BY cid",
        )
        .bind(&table)
        .fetch_all(&mut *conn)
        .await?;

        let sample_sql = format!("SELECT * FROM {} LIMIT {SAMPLE_ROWS}", quote_ident(&table));
        let sample = fetch_rows(&mut conn, &sample_sql).await?;

        out.insert(
            table,
            TableSchema {
                columns,
                sample_data: sample.rows,
            },
        );
    }

    Ok(out)
}
