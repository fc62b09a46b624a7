// vision-relay - Token-gated image analysis relay for the OpenAI Responses API

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{debug, info, warn};
use vision_relay::cli::Args;
use vision_relay::config::AppConfig;
use vision_relay::openai::OpenAiClient;
use vision_relay::server::{create_router, AppState, IpRateLimiter};
use vision_relay::utils::logging;

/// How often idle rate limiter entries are dropped
const LIMITER_PRUNE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load .env, then configuration
    let dotenv_loaded = dotenvy::dotenv().is_ok();
    let config = AppConfig::load(&args)?;

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting vision-relay v{}", env!("CARGO_PKG_VERSION"));
    if dotenv_loaded {
        debug!("Loaded environment from .env");
    }
    config.validate()?;

    // Phase 3: Build the provider client
    let provider = OpenAiClient::new(&config.provider)?;
    info!(
        "Forwarding to {} with model {}",
        provider.base_url(),
        config.provider.model
    );
    if config.security.required_token().is_none() {
        warn!("No APP_TOKEN configured; /analyze is open to any caller");
    }

    // Phase 4: Build and start HTTP server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let state = AppState::new(config, Arc::new(provider));
    if let Some(limiter) = state.rate_limiter.clone() {
        tokio::spawn(prune_rate_limiter(limiter));
    }
    let app = create_router(state);

    info!("Backend running on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Phase 5: Run server with graceful shutdown
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn prune_rate_limiter(limiter: IpRateLimiter) {
    let mut interval = tokio::time::interval(LIMITER_PRUNE_INTERVAL);
    loop {
        interval.tick().await;
        limiter.retain_recent();
        debug!("Rate limiter tracking {} clients", limiter.len());
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
