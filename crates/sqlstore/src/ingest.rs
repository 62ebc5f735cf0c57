use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments};
use tabular::{Cell, Frame};
use tracing::debug;

use crate::{quote_ident, Result, Store, StoreError};

// `_` is a LIKE wildcard, so the internal-table prefix is compared literally
pub(crate) const USER_TABLES_SQL: &str =
    "SELECT name FROM sqlite_master WHERE type = 'table' AND substr(name, 1, 7) <> 'sqlite_' ORDER BY name";

type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// Replace dataset `name` with the contents of `frame`.
///
/// Drop, create and insert all run in one transaction: a reader sees the old
/// table or the new one, and a failed write leaves the old table in place.
/// Returns the number of rows written.
pub async fn replace_dataset(store: &Store, name: &str, frame: &Frame) -> Result<u64> {
    if name.is_empty() {
        return Err(StoreError::InvalidDataset("empty dataset name".to_string()));
    }
    if frame.columns.is_empty() {
        return Err(StoreError::InvalidDataset(format!("dataset {name} has no columns")));
    }

    let types = frame.column_types();
    let table = quote_ident(name);

    let column_defs = frame
        .columns
        .iter()
        .zip(&types)
        .map(|(col, ty)| format!("{} {}", quote_ident(col), ty.sql_name()))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = vec!["?"; frame.columns.len()].join(", ");

    let drop_sql = format!("DROP TABLE IF EXISTS {table}");
    let create_sql = format!("CREATE TABLE {table} ({column_defs})");
    let insert_sql = format!("INSERT INTO {table} VALUES ({placeholders})");

    let mut tx = store.pool().begin().await?;

    sqlx::query(&drop_sql).execute(&mut *tx).await?;
    sqlx::query(&create_sql).execute(&mut *tx).await?;
    debug!(dataset = name, sql = %create_sql, "dataset table created");

    for row in &frame.rows {
        let mut q = sqlx::query(&insert_sql);
        for (cell, ty) in row.iter().zip(&types) {
            q = bind_cell(q, cell.coerce(*ty));
        }
        q.execute(&mut *tx).await?;
    }

    tx.commit().await?;
    Ok(frame.row_count() as u64)
}

fn bind_cell(q: SqliteQuery<'_>, cell: Cell) -> SqliteQuery<'_> {
    match cell {
        Cell::Null => q.bind(None::<String>),
        Cell::Integer(v) => q.bind(v),
        Cell::Real(v) => q.bind(v),
        Cell::Boolean(b) => q.bind(b),
        Cell::Text(s) => q.bind(s),
    }
}

/// Names of all user tables, sorted.
pub async fn list_datasets(store: &Store) -> Result<Vec<String>> {
    let names = sqlx::query_scalar::<_, String>(USER_TABLES_SQL)
        .fetch_all(store.pool())
        .await?;
    Ok(names)
}
