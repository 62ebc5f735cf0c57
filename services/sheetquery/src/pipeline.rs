//! The three boundary operations. Routes and the startup preload are thin
//! wrappers around these.

use serde::Serialize;
use serde_json::{Map, Value};
use sqlstore::{describe_store, execute, replace_dataset, SchemaDescription, StoreError};
use std::path::{Path, PathBuf};
use tabular::{dataset_name_from_filename, normalize_dataset_name, read_path, SourceFormat};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppContext;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub table_name: String,
    pub row_count: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QueryOutcome {
    pub sql_query: String,
    pub results: Vec<Map<String, Value>>,
    pub count: usize,
}

/// Ingest a file already on disk. `filename` picks the reader and, unless a
/// `name` hint is given, the dataset name.
pub async fn ingest_file(
    ctx: &AppContext,
    path: &Path,
    filename: &str,
    name: Option<&str>,
) -> Result<IngestReport, ApiError> {
    let format = SourceFormat::from_filename(filename)?;

    let table_name = match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(hint) => normalize_dataset_name(hint),
        None => dataset_name_from_filename(filename),
    };
    if table_name.is_empty() {
        return Err(ApiError::Validation(format!(
            "Cannot derive a table name from {filename:?}"
        )));
    }

    let owned: PathBuf = path.to_path_buf();
    let frame = tokio::task::spawn_blocking(move || read_path(&owned, format))
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("reader task failed: {e}")))??;
    debug!(
        table = %table_name,
        columns = ?frame.columns,
        rows = frame.row_count(),
        "sheet parsed"
    );

    let row_count = replace_dataset(&ctx.store, &table_name, &frame)
        .await
        .map_err(|e| match e {
            StoreError::InvalidDataset(m) => ApiError::Validation(m),
            other => ApiError::Ingestion(other.to_string()),
        })?;

    info!(table = %table_name, rows = row_count, "dataset replaced");
    Ok(IngestReport { table_name, row_count })
}

pub async fn get_schema(ctx: &AppContext) -> Result<SchemaDescription, ApiError> {
    describe_store(&ctx.store)
        .await
        .map_err(|e| ApiError::Database(e.to_string()))
}

/// Natural language in, rows out. Schema is read fresh for every call.
pub async fn run_nl_query(ctx: &AppContext, text: &str) -> Result<QueryOutcome, ApiError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ApiError::Validation("No query provided".to_string()));
    }

    // Missing credential must fail before the store or the network is touched.
    ctx.synthesizer.provider().check_credentials()?;

    let schema = if ctx.synthesizer.wants_schema() {
        Some(get_schema(ctx).await?)
    } else {
        None
    };

    let query = ctx.synthesizer.synthesize(text, schema.as_ref()).await?;
    let rows = execute(&ctx.store, &query.sql, ctx.exec_mode).await?;

    Ok(QueryOutcome {
        count: rows.row_count(),
        results: rows.to_records(),
        sql_query: query.sql,
    })
}
