use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::{Column, Executor, Row, Statement, TypeInfo, ValueRef};
use thiserror::Error;

use crate::{ScalarValue, Store};

/// Rows of a successful statement. `columns` and every row have the same length.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<ScalarValue>>,
}

impl ResultSet {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Rows as field -> value objects, keys in column order.
    pub fn to_records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().map(ScalarValue::to_json))
                    .collect()
            })
            .collect()
    }
}

/// The store rejected a statement. Carries the statement verbatim.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("SQL execution error: {message}")]
pub struct ExecutionFailure {
    pub sql: String,
    pub message: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecMode {
    /// Run whatever the statement is.
    #[default]
    Verbatim,
    /// Run with `PRAGMA query_only` on, so the store refuses writes.
    ReadOnly,
}

/// Execute one statement. Never returns a store error directly: every
/// failure, including connection trouble, becomes an [`ExecutionFailure`].
pub async fn execute(store: &Store, sql: &str, mode: ExecMode) -> Result<ResultSet, ExecutionFailure> {
    let fail = |e: sqlx::Error| ExecutionFailure {
        sql: sql.to_string(),
        message: e.to_string(),
    };

    let mut conn = store.pool().acquire().await.map_err(fail)?;

    if mode == ExecMode::ReadOnly {
        sqlx::query("PRAGMA query_only = ON")
            .execute(&mut *conn)
            .await
            .map_err(fail)?;
    }

    // the pool clears query_only again on the next checkout
    fetch_rows(&mut conn, sql).await.map_err(fail)
}

/// Prepare `sql`, take column names from the statement, then fetch all rows.
/// Columns come from the statement so they are known even for empty results.
pub(crate) async fn fetch_rows(conn: &mut SqliteConnection, sql: &str) -> Result<ResultSet, sqlx::Error> {
    let stmt = Executor::prepare(&mut *conn, sql).await?;
    let columns: Vec<String> = stmt.columns().iter().map(|c| c.name().to_string()).collect();

    let fetched = stmt.query().fetch_all(&mut *conn).await?;

    let mut rows = Vec::with_capacity(fetched.len());
    for row in &fetched {
        let values = (0..columns.len())
            .map(|i| decode_value(row, i))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(values);
    }

    Ok(ResultSet { columns, rows })
}

fn decode_value(row: &SqliteRow, idx: usize) -> Result<ScalarValue, sqlx::Error> {
    let raw = row.try_get_raw(idx)?;
    if raw.is_null() {
        return Ok(ScalarValue::Null);
    }

    // non-null values report their storage class, not the declared column type
    let class = raw.type_info().name().to_string();
    let value = match class.as_str() {
        "INTEGER" | "BOOLEAN" => ScalarValue::Integer(row.try_get_unchecked(idx)?),
        "REAL" | "NUMERIC" => ScalarValue::Real(row.try_get_unchecked(idx)?),
        "BLOB" => ScalarValue::Blob(row.try_get_unchecked(idx)?),
        _ => ScalarValue::Text(row.try_get_unchecked(idx)?),
    };
    Ok(value)
}
