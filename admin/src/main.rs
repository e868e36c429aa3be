mod agent;
mod config;
mod lifecycle;
mod metrics;
mod middleware;
mod page;
mod routes;
mod status;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::agent::{Agent, StateFileAgent};
use crate::config::AdminConfig;
use crate::lifecycle::Lifecycle;
use crate::middleware::admin_gate::{digest_credential, AdminGate};
use crate::page::PageShell;
use crate::status::StatusAssembler;

#[derive(Parser)]
#[command(name = "agentadmin", about = "Status page and admin controls for the trading agent")]
struct Cli {
    /// Load config from a specific .env file
    #[arg(long)]
    config_file: Option<String>,

    /// Override the listen port
    #[arg(long)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the ADMIN_PASS_SHA256 value for a credential and exit
    HashPassword { credential: String },
}

/// Shared application state passed to all route handlers via Axum's State extractor.
#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<dyn Agent>,
    pub status: Arc<StatusAssembler>,
    pub gate: AdminGate,
    pub lifecycle: Lifecycle,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        // Liveness
        .route("/health", get(routes::health::health))
        // Public read endpoints
        .route("/balance", get(routes::telemetry::balance))
        .route("/profit", get(routes::telemetry::profit))
        .route("/status", get(routes::report::status))
        .route("/orders", get(routes::report::orders))
        // Privileged endpoints (admin code required)
        .route("/restart", get(routes::lifecycle::restart))
        .route("/seppuku", get(routes::lifecycle::shutdown))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(Command::HashPassword { credential }) = cli.command {
        println!("{}", digest_credential(&credential).to_hex());
        return Ok(());
    }

    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AdminConfig::from_env_file(cli.config_file.as_deref())?;
    let port = cli.port.unwrap_or(config.port);
    info!(
        "Configuration loaded (port={}, agent_state={})",
        port,
        config.agent_state_path.display()
    );

    let agent: Arc<dyn Agent> = Arc::new(StateFileAgent::new(config.agent_state_path.clone()));
    let shell = PageShell::new(config.page_title.clone(), config.status_refresh_secs);
    let lifecycle = Lifecycle::new();

    let state = AppState {
        agent: agent.clone(),
        status: Arc::new(StatusAssembler::new(agent, shell)),
        gate: AdminGate::new(config.admin_digest.clone()),
        lifecycle: lifecycle.clone(),
    };

    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Agent admin v{} listening on {}", env!("CARGO_PKG_VERSION"), addr);
    info!("Routes:");
    info!("  GET  /health");
    info!("  GET  /balance");
    info!("  GET  /profit");
    info!("  GET  /status");
    info!("  GET  /orders");
    info!("  GET  /restart?pass=...");
    info!("  GET  /seppuku?pass=...");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let signal = lifecycle.clone();
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        let action = signal.requested().await;
        info!("{} requested, no longer accepting connections", action);
    });
    let mut server = tokio::spawn(async move { server.await });

    let action = tokio::select! {
        result = &mut server => {
            result??;
            return Ok(());
        }
        action = lifecycle.requested() => action,
    };

    let drain_limit = Duration::from_secs(config.shutdown_drain_secs);
    if !crate::lifecycle::drain(&mut server, drain_limit).await {
        warn!(
            "In-flight requests still open after {}s, proceeding with {}",
            config.shutdown_drain_secs, action
        );
    }
    crate::lifecycle::perform(action)
}
