//! Podcast Contrast Service
//!
//! HTTP service that, given a topic, asks the configured AI provider for two
//! well-known podcasts with opposed stances on it and relays the answer.
//!
//! # Service Topology
//!
//! - `/health` - Health check endpoint
//! - `/ready` - Readiness (provider credential configured)
//! - `/api/analyze` - Topic contrast analysis (POST)
//! - `/api/info` - Service and provider info

use anyhow::Result;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod routes;

use routes::{router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "podcast_contrast=info,podcast_contrast_agents=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!(
        service = "podcast-contrast",
        version = env!("CARGO_PKG_VERSION"),
        "Starting Podcast Contrast service"
    );

    let config = config::Config::load()?;
    let port = config.port;

    let state = AppState::new(config)?;
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
