// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ad generator API server
//!
//! Serves the ad generator front-end and its backend endpoints.

use adgen_server::{
    config::{find_free_port, Config},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    let port = find_free_port(config.port)?;
    tracing::info!(
        port,
        public_dir = %config.public_dir.display(),
        data_dir = %config.data_dir.display(),
        "Starting ad generator server"
    );

    let missing = config.secrets.missing();
    if missing.is_empty() {
        tracing::info!("All provider credentials configured");
    } else {
        tracing::warn!(missing = ?missing, "Some provider credentials are not configured");
    }

    if config.razorpay_is_mocked() {
        tracing::warn!("Razorpay order creation is mocked");
    }

    // Build shared state
    let state = Arc::new(AppState::from_config(config).await?);

    // Build router
    let app = adgen_server::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("adgen_server=debug,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}
