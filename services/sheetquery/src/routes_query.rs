use axum::extract::{rejection::JsonRejection, State};
use axum::Json;
use serde::Deserialize;

use crate::error::ApiError;
use crate::pipeline::{run_nl_query, QueryOutcome};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct QueryReq {
    #[serde(default)]
    pub query: String,
}

/// `POST /query_nl`. A missing or unreadable body is reported the same way as
/// an empty query.
pub async fn query_nl(
    State(state): State<SharedState>,
    body: Result<Json<QueryReq>, JsonRejection>,
) -> Result<Json<QueryOutcome>, ApiError> {
    let Json(req) = body.map_err(|_| ApiError::Validation("No query provided".to_string()))?;
    Ok(Json(run_nl_query(&state, &req.query).await?))
}
