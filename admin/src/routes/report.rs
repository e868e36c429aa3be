use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};
use tracing::trace;

use super::telemetry_unavailable;
use crate::AppState;

/// GET /status
///
/// Human-readable status page. Each call also updates the rolling load-time
/// average shown at the bottom of the page.
pub async fn status(State(state): State<AppState>) -> Response {
    trace!("/status endpoint hit");
    match state.status.render() {
        Ok(page) => Html(page).into_response(),
        Err(e) => telemetry_unavailable("/status", e).into_response(),
    }
}

/// GET /orders
///
/// The agent's order log inside the same page shell as /status.
pub async fn orders(State(state): State<AppState>) -> Response {
    trace!("/orders endpoint hit");
    match state.agent.order_history() {
        Ok(history) => {
            let body = format!("<a href=\"/status\">Back</a>{history}");
            Html(state.status.shell().wrap(&body)).into_response()
        }
        Err(e) => telemetry_unavailable("/orders", e).into_response(),
    }
}
