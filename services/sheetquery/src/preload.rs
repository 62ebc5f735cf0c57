use anyhow::{anyhow, Result};
use std::path::PathBuf;
use tracing::info;

use crate::pipeline::ingest_file;
use crate::state::AppContext;

/// One startup dataset: `path`, or `name=path` to choose the table name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreloadEntry {
    pub name: Option<String>,
    pub path: PathBuf,
}

/// Parse a comma-separated `PRELOAD_DATA` value.
pub fn parse_preload(raw: &str) -> Vec<PreloadEntry> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|entry| match entry.split_once('=') {
            Some((name, path)) if !name.trim().is_empty() => PreloadEntry {
                name: Some(name.trim().to_string()),
                path: PathBuf::from(path.trim()),
            },
            _ => PreloadEntry {
                name: None,
                path: PathBuf::from(entry.trim_start_matches('=')),
            },
        })
        .collect()
}

/// Ingest every entry through the normal ingestion path. Stops at the first failure.
pub async fn preload(ctx: &AppContext, entries: &[PreloadEntry]) -> Result<()> {
    for entry in entries {
        let filename = entry
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .ok_or_else(|| anyhow!("preload path has no file name: {}", entry.path.display()))?;

        let report = ingest_file(ctx, &entry.path, filename, entry.name.as_deref())
            .await
            .map_err(|e| anyhow!("preload of {} failed: {e}", entry.path.display()))?;

        info!(
            path = %entry.path.display(),
            table = %report.table_name,
            rows = report.row_count,
            "preloaded dataset"
        );
    }
    Ok(())
}
