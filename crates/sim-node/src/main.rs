//! forge-sim binary
//!
//! Serves `POST /simulate` and `GET /health`, running forge fork tests for
//! each simulation request.

mod cli;
mod config;

use std::sync::Arc;

use anyhow::Result;
use cli::Cli;
use config::SimConfig;
use sim_forge::Simulator;
use sim_server::{ServerState, SimServer};
use sim_types::fixtures::mock_request_body;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = SimConfig::from(&cli);
    tracing::info!("forge-sim starting on {}", config.server.listen_addr);

    let simulator = Simulator::new(Arc::new(config.forge.executor()), config.defaults.clone());
    tracing::info!(
        "Default fork {} ({}:{})",
        simulator.defaults().rpc_url,
        simulator.defaults().contract,
        simulator.defaults().test
    );
    let mut state = ServerState::new(simulator);
    if config.mock_request {
        tracing::warn!("Mock request mode enabled: request bodies are ignored");
        state = state.with_mock_request(mock_request_body());
    }

    let server = SimServer::new(config.server.clone(), state);
    server.run(shutdown_signal()).await?;

    tracing::info!("forge-sim stopped");

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received, shutting down server...");
}
