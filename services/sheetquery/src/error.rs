use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use nlsql::SynthError;
use serde_json::json;
use sqlstore::ExecutionFailure;
use tabular::TabularError;
use thiserror::Error;
use tracing::error;

/// Every failure a boundary operation can report.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    UnsupportedFormat(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    Configuration(String),

    #[error("AI processing error: {0}")]
    AiProcessing(String),

    #[error("SQL execution error: {message}")]
    SqlExecution { sql: String, message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Ingestion error: {0}")]
    Ingestion(String),

    #[error("An unexpected error occurred")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::UnsupportedFormat(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "ValidationError",
            ApiError::UnsupportedFormat(_) => "UnsupportedFormatError",
            ApiError::NotFound(_) => "NotFoundError",
            ApiError::PayloadTooLarge(_) => "PayloadTooLargeError",
            ApiError::Configuration(_) => "ConfigurationError",
            ApiError::AiProcessing(_) => "AIProcessingError",
            ApiError::SqlExecution { .. } => "SQLExecutionError",
            ApiError::Database(_) => "DatabaseError",
            ApiError::Ingestion(_) => "IngestionError",
            ApiError::Internal(_) => "InternalError",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = json!({
            "error": self.to_string(),
            "type": self.kind(),
        });

        match &self {
            ApiError::SqlExecution { sql, .. } => {
                body["sql_query"] = json!(sql);
            }
            ApiError::Internal(err) => {
                error!(error = ?err, "unhandled error");
                body["details"] = json!(format!("{err:#}"));
            }
            _ => {}
        }

        (status, Json(body)).into_response()
    }
}

impl From<TabularError> for ApiError {
    fn from(e: TabularError) -> Self {
        match e {
            TabularError::UnsupportedFormat(_) => ApiError::UnsupportedFormat(e.to_string()),
            other => ApiError::Ingestion(other.to_string()),
        }
    }
}

impl From<SynthError> for ApiError {
    fn from(e: SynthError) -> Self {
        match e {
            SynthError::MissingCredential(_) => ApiError::Configuration(e.to_string()),
            other => ApiError::AiProcessing(other.to_string()),
        }
    }
}

impl From<ExecutionFailure> for ApiError {
    fn from(f: ExecutionFailure) -> Self {
        ApiError::SqlExecution {
            sql: f.sql,
            message: f.message,
        }
    }
}
