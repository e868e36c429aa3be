pub mod health;
pub mod lifecycle;
pub mod report;
pub mod telemetry;


use axum::http::StatusCode;
use tracing::warn;

use crate::agent::AgentError;

/// Telemetry failures surface as a plain 500; a stale or partial figure is
/// never shown instead.
fn telemetry_unavailable(path: &str, err: AgentError) -> (StatusCode, &'static str) {
    warn!("{} failed: {}", path, err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Agent telemetry unavailable",
    )
}
