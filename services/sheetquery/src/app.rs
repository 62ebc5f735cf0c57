use axum::extract::DefaultBodyLimit;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::json;
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tracing::error;

use crate::error::ApiError;
use crate::routes_health::health;
use crate::routes_query::query_nl;
use crate::routes_schema::get_schema;
use crate::routes_upload::upload_excel;
use crate::state::SharedState;

pub fn build_router(state: SharedState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route(
            "/upload_excel",
            post(upload_excel).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/schema", get(get_schema))
        .route("/query_nl", post(query_nl))
        .route("/health", get(health))
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Resource not found".to_string())
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!(%details, "handler panicked");

    let body = json!({
        "error": "An unexpected error occurred",
        "type": "InternalError",
        "details": details,
    });
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "application/json")],
        body.to_string(),
    )
        .into_response()
}
