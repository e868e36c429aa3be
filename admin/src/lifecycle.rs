use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info};

/// Privileged, non-idempotent operations on the host process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    Restart,
    Shutdown,
}

impl fmt::Display for AdminAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdminAction::Restart => write!(f, "restart"),
            AdminAction::Shutdown => write!(f, "shutdown"),
        }
    }
}

/// Shared handle that carries an accepted admin action from a request
/// handler to the server loop.
#[derive(Clone)]
pub struct Lifecycle {
    tx: Arc<watch::Sender<Option<AdminAction>>>,
}

impl Lifecycle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Record an action. Only the first one counts; returns whether this call
    /// was it.
    pub fn trigger(&self, action: AdminAction) -> bool {
        self.tx.send_if_modified(|pending| {
            if pending.is_some() {
                return false;
            }
            *pending = Some(action);
            true
        })
    }

    pub fn pending(&self) -> Option<AdminAction> {
        *self.tx.borrow()
    }

    /// Resolves with the first accepted action. Used as the server's
    /// graceful-shutdown signal.
    pub async fn requested(&self) -> AdminAction {
        let mut rx = self.tx.subscribe();
        loop {
            if let Some(action) = *rx.borrow_and_update() {
                return action;
            }
            if rx.changed().await.is_err() {
                // Sender dropped: no action can arrive any more.
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Wait up to `limit` for the server to finish draining. Returns false if
/// the limit was hit; the caller proceeds with the action either way.
pub async fn drain<F: Future>(server: F, limit: Duration) -> bool {
    tokio::time::timeout(limit, server).await.is_ok()
}

/// Carry out an action once the server has stopped accepting requests.
pub fn perform(action: AdminAction) -> ! {
    match action {
        AdminAction::Shutdown => {
            info!("Shutting down");
            std::process::exit(1);
        }
        AdminAction::Restart => {
            info!("Restarting");
            let err = reexec();
            error!("Restart failed: {err}");
            std::process::exit(1);
        }
    }
}

/// Replace the current process with a fresh copy of the same binary and
/// arguments. Only returns on failure.
#[cfg(unix)]
fn reexec() -> anyhow::Error {
    use std::os::unix::process::CommandExt;

    match std::env::current_exe() {
        Ok(exe) => std::process::Command::new(exe)
            .args(std::env::args_os().skip(1))
            .exec()
            .into(),
        Err(e) => e.into(),
    }
}

#[cfg(not(unix))]
fn reexec() -> anyhow::Error {
    let spawned = std::env::current_exe().and_then(|exe| {
        std::process::Command::new(exe)
            .args(std::env::args_os().skip(1))
            .spawn()
    });
    match spawned {
        Ok(_) => std::process::exit(0),
        Err(e) => e.into(),
    }
}
