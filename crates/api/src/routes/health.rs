use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use common::Variant;

pub fn health_router(variant: Variant) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .with_state(variant)
}

/// Liveness probe. Does not touch the quote provider.
async fn healthz(State(variant): State<Variant>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "variant": variant.to_string(),
    }))
}
