use axum::Json;
use serde_json::{json, Value};

/// Liveness probe reporting the core crate version.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": taskdeck_core::core_version(),
    }))
}
