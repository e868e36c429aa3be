use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::AppState;

/// GET /health
///
/// Liveness check. Reports `draining` once a restart or shutdown has been
/// accepted and the server is finishing in-flight requests.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let status = match state.lifecycle.pending() {
        Some(_) => "draining",
        None => "ok",
    };
    Json(json!({
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
        "pending_action": state.lifecycle.pending().map(|a| a.to_string()),
    }))
}
