//! ebe-av (Address Validation) - Main entry point
//!
//! Serves `POST /api/validate-addresses` for the registration wizard and
//! `GET /health` for monitoring.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use ebe_av::api::spawn_pruning;
use ebe_av::services::{GoogleMapsClient, GoogleMapsValidator};
use ebe_av::{build_router, AppState};
use ebe_common::config::{ConfigOverrides, ServiceConfig, TomlConfig};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for ebe-av
#[derive(Parser, Debug)]
#[command(name = "ebe-av")]
#[command(about = "Address validation service for 8by8 voter registration")]
#[command(version)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "EBE_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind to
    #[arg(long, env = "EBE_AV_BIND")]
    bind: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "EBE_AV_PORT")]
    port: Option<u16>,

    /// Google Maps Address Validation API key
    #[arg(long, env = "GOOGLE_MAPS_API_KEY", hide_env_values = true)]
    google_maps_api_key: Option<String>,

    /// Address Validation API endpoint
    #[arg(long, env = "EBE_AV_ENDPOINT")]
    endpoint: Option<String>,

    /// Timeout for each Address Validation API call, in seconds
    #[arg(long, env = "EBE_AV_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, env = "EBE_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            bind_address: self.bind.clone(),
            port: self.port,
            google_maps_api_key: self.google_maps_api_key.clone(),
            address_validation_endpoint: self.endpoint.clone(),
            request_timeout_secs: self.timeout_secs,
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let file = TomlConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    let config = ServiceConfig::resolve(args.overrides(), file).context("Invalid configuration")?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("ebe_av={},tower_http={}", config.logging.level, config.logging.level)
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting 8by8 Address Validation (ebe-av) v{}",
        env!("CARGO_PKG_VERSION")
    );
    info!(
        "Rate limit: {} requests per {}s per client (trust x-forwarded-for: {})",
        config.rate_limit.allowed_requests,
        config.rate_limit.period_secs,
        config.rate_limit.trust_forwarded_for
    );

    let client = GoogleMapsClient::from_config(&config)
        .context("Failed to create Address Validation API client")?;
    let validator = Arc::new(GoogleMapsValidator::new(client));

    let state = AppState::new(validator, &config.rate_limit)?;
    spawn_pruning(state.rate_limiter.clone(), config.rate_limit.prune_interval());
    let app = build_router(state);

    let listen_address = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&listen_address)
        .await
        .with_context(|| format!("Failed to bind to {}", listen_address))?;
    info!("ebe-av listening on http://{}", listen_address);
    info!("Health check: http://{}/health", listen_address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        },
    }
}
