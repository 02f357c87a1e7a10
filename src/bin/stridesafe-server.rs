// ABOUTME: HTTP server binary for the StrideSafe API
// ABOUTME: Loads configuration, opens the database, wires the phase service, and serves routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # StrideSafe Server Binary
//!
//! Starts the HTTP API. All configuration comes from the environment; see
//! `stridesafe_server::config::environment` for the variables.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use stridesafe_server::{
    config::{DatabaseUrl, ServerConfig},
    database::Database,
    inference::HttpPhaseEstimator,
    logging,
    resources::ServerResources,
    routes,
    services::PhaseService,
};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "stridesafe-server")]
#[command(about = "StrideSafe - movement-safety and rehab-tracking API")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL (`sqlite:<path>` or `sqlite::memory:`)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(url) = args.database_url {
        config.database = DatabaseUrl::parse_url(&url);
    }

    logging::init_from_env()?;

    info!("Starting StrideSafe server");
    info!("{}", config.summary());

    let database = Database::new(&config.database).await?;

    let phase_service = match HttpPhaseEstimator::from_config(&config.inference)? {
        Some(estimator) => {
            info!(endpoint = %estimator.endpoint(), "Remote phase inference enabled");
            PhaseService::with_estimator(Arc::new(estimator))
        }
        None => {
            info!("Remote phase inference disabled, using on-device estimates only");
            PhaseService::local()
        }
    };

    let config = Arc::new(config);
    let resources = Arc::new(ServerResources::new(
        database,
        phase_service,
        Arc::clone(&config),
    ));
    let app = routes::router(resources);

    let listener = TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address()))?;
    info!("Listening on http://{}", config.bind_address());

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {e}");
        return Err(e.into());
    }

    info!("Server shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
        return;
    }
    info!("Shutdown signal received");
}
