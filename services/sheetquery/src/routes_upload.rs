use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use tracing::info;

use crate::error::ApiError;
use crate::pipeline::ingest_file;
use crate::state::SharedState;

/// `POST /upload_excel`: multipart `file` (required) and `name` (optional).
pub async fn upload_excel(
    State(state): State<SharedState>,
    mut mp: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut name: Option<String> = None;
    let mut upload: Option<(String, axum::body::Bytes)> = None;

    while let Some(field) = mp
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        match field.name() {
            Some("name") => {
                name = Some(field.text().await.map_err(multipart_error)?);
            }
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                upload = Some((filename, bytes));
            }
            _ => {}
        }
    }

    let (filename, bytes) = upload.ok_or_else(|| ApiError::Validation("No file part".to_string()))?;
    if filename.is_empty() {
        return Err(ApiError::Validation("No selected file".to_string()));
    }
    if !tabular::is_accepted(&filename) {
        return Err(ApiError::UnsupportedFormat("File type not allowed".to_string()));
    }

    let staged = state
        .staging
        .stage(&filename, &bytes)
        .await
        .map_err(|e| ApiError::Ingestion(format!("failed to stage upload: {e}")))?;

    let result = ingest_file(&state, &staged, &filename, name.as_deref()).await;
    state.staging.release(&staged).await;
    let report = result?;

    info!(file = %filename, table = %report.table_name, rows = report.row_count, "upload ingested");

    Ok(Json(json!({
        "success": true,
        "message": format!(
            "File uploaded and processed successfully. Created table: {}",
            report.table_name
        ),
        "table_name": report.table_name,
        "row_count": report.row_count,
    })))
}

/// Oversized bodies get their own error; anything else is a malformed request.
fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(format!("File too large: {}", e.body_text()))
    } else {
        ApiError::Validation(e.body_text())
    }
}
