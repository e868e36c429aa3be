use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use tracing::{info, trace, warn};

use crate::lifecycle::AdminAction;
use crate::AppState;

#[derive(Deserialize)]
pub struct AdminQuery {
    pub pass: Option<String>,
}

/// GET /restart?pass=...
///
/// Restarts the process once in-flight requests finish. Always answers with
/// an empty 200 so callers cannot tell a rejected code from an accepted one.
pub async fn restart(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    query: Option<Query<AdminQuery>>,
) -> StatusCode {
    trace!("/restart endpoint hit");
    handle(&state, addr, credential(query.as_ref()), AdminAction::Restart);
    StatusCode::OK
}

/// GET /seppuku?pass=...
///
/// Stops the process with a non-zero exit status. Same response contract as
/// /restart.
pub async fn shutdown(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    query: Option<Query<AdminQuery>>,
) -> StatusCode {
    trace!("/seppuku endpoint hit");
    handle(&state, addr, credential(query.as_ref()), AdminAction::Shutdown);
    StatusCode::OK
}

/// A query string that does not parse counts as a missing code.
fn credential(query: Option<&Query<AdminQuery>>) -> Option<&str> {
    query.and_then(|Query(q)| q.pass.as_deref())
}

fn handle(state: &AppState, addr: SocketAddr, pass: Option<&str>, action: AdminAction) {
    let Some(pass) = pass else {
        warn!("Missing {} code from IP-address: {}", action, addr.ip());
        return;
    };

    if !state.gate.verify(pass) {
        warn!("Incorrect {} code from IP-address: {}", action, addr.ip());
        return;
    }

    if state.lifecycle.trigger(action) {
        info!("{} received from IP-address: {}", action, addr.ip());
    } else if let Some(pending) = state.lifecycle.pending() {
        info!(
            "{} from IP-address {} ignored, {} already pending",
            action,
            addr.ip(),
            pending
        );
    }
}
