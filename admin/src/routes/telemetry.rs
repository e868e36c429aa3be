use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::trace;

use super::telemetry_unavailable;
use crate::AppState;

/// GET /balance
///
/// Current total balance in BTC, as plain decimal text.
pub async fn balance(State(state): State<AppState>) -> Response {
    trace!("/balance endpoint hit");
    match state.agent.current_balance() {
        Ok(balance) => (StatusCode::OK, balance.to_string()).into_response(),
        Err(e) => telemetry_unavailable("/balance", e).into_response(),
    }
}

/// GET /profit
///
/// Current profit in percent, as plain decimal text.
pub async fn profit(State(state): State<AppState>) -> Response {
    trace!("/profit endpoint hit");
    match state.agent.current_profit() {
        Ok(profit) => (StatusCode::OK, profit.to_string()).into_response(),
        Err(e) => telemetry_unavailable("/profit", e).into_response(),
    }
}
