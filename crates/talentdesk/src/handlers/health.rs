//! Health check endpoint.

use axum::Json;
use serde_json::{json, Value};

/// GET /health - Liveness probe.
///
/// Returns 200 immediately without touching the store.
#[axum::debug_handler]
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
