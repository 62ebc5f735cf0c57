use axum::{extract::State, Json};
use sqlstore::SchemaDescription;

use crate::error::ApiError;
use crate::state::SharedState;

pub async fn get_schema(State(state): State<SharedState>) -> Result<Json<SchemaDescription>, ApiError> {
    Ok(Json(crate::pipeline::get_schema(&state).await?))
}
