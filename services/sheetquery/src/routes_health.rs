use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::SharedState;

pub async fn health(State(state): State<SharedState>) -> Json<Value> {
    let store = match state.store.ping().await {
        Ok(()) => "ok",
        Err(_) => "unreachable",
    };

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "store": store,
        "provider": state.synthesizer.provider().info(),
    }))
}
