//! Gateway Daemon - Counsel Ask-Proxy Server
//!
//! This is the main entry point for the Counsel gateway, the HTTP daemon
//! sitting between chat clients and the retrieval backend. Clients POST
//! questions to `/api/v1/ask`; the daemon forwards them to the backend's
//! `/chat` endpoint and reshapes the reply.
//!
//! # Usage
//!
//! ```bash
//! # Start with defaults (binds 127.0.0.1:3000, backend at 127.0.0.1:8000)
//! gateway-daemon
//!
//! # Custom backend
//! gateway-daemon --backend-url http://retrieval.internal:8000
//!
//! # With config file
//! gateway-daemon --config /etc/counsel/gateway.toml
//!
//! # Verbose logging
//! RUST_LOG=debug gateway-daemon
//! ```
//!
//! # Signals
//!
//! - `SIGTERM` / `SIGINT`: Graceful shutdown

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{info, warn};

use gateway_core::{
    build_router, default_config_path, load_config_from_path, AppState, ConfigError,
    ConfigOverrides, Gateway, GatewayConfig, HttpRetrievalBackend,
};

/// Gateway Daemon - ask-proxy server for Counsel
#[derive(Parser, Debug)]
#[command(name = "gateway-daemon")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Address to bind the HTTP listener on
    #[arg(short = 'b', long, env = "GATEWAY_BIND", value_name = "ADDR")]
    bind: Option<String>,

    /// Base URL of the retrieval backend
    #[arg(long, env = "BACKEND_URL", value_name = "URL")]
    backend_url: Option<String>,

    /// Per-request timeout towards the backend in seconds (0 = unbounded)
    #[arg(long, env = "GATEWAY_REQUEST_TIMEOUT_SECS", value_name = "SECS")]
    request_timeout_secs: Option<u64>,

    /// Configuration file path
    #[arg(short = 'c', long, env = "GATEWAY_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, env = "GATEWAY_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

/// Initialize logging with the specified level
fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("gateway_daemon={level},gateway_core={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Resolve the effective configuration: file, then env, then CLI flags.
fn resolve_config(args: &Args) -> Result<GatewayConfig, ConfigError> {
    let config_path = args.config.clone().or_else(default_config_path);
    let mut config = load_config_from_path(config_path)?;

    let mut overrides = ConfigOverrides::new();
    if let Some(ref bind) = args.bind {
        overrides = overrides.with_bind_addr(bind.clone());
    }
    if let Some(ref url) = args.backend_url {
        overrides = overrides.with_backend_url(url.clone());
    }
    if let Some(secs) = args.request_timeout_secs {
        overrides = overrides.with_request_timeout_secs(secs);
    }
    overrides.apply(&mut config);

    Ok(config)
}

/// Wait for SIGTERM or SIGINT.
async fn shutdown_signal() {
    let mut sigterm = signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");
    let mut sigint = signal(SignalKind::interrupt()).expect("Failed to install SIGINT handler");

    tokio::select! {
        _ = sigterm.recv() => {
            info!("Received SIGTERM, initiating shutdown");
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, initiating shutdown");
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging first
    init_logging(&args.log_level);

    info!("Counsel gateway daemon starting");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("PID: {}", std::process::id());

    let config = resolve_config(&args)?;
    info!(source = %config.source(), "Configuration resolved");
    info!(backend_url = %config.backend_url, "Retrieval backend");
    info!(
        request_timeout_secs = config.request_timeout_secs,
        "Backend request timeout"
    );

    let backend =
        HttpRetrievalBackend::new(config.backend_url.clone(), config.request_timeout_secs);
    let gateway = Gateway::new(backend);

    if gateway.health_check().await {
        info!(backend = gateway.backend_name(), "Backend reachable");
    } else {
        warn!(
            backend = gateway.backend_name(),
            "Backend not reachable yet; ask requests will fail until it comes up"
        );
    }

    let app = build_router(AppState::new(gateway));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!(bind_addr = %config.bind_addr, "Gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Gateway server failed")?;

    info!("Gateway daemon stopped cleanly");
    Ok(())
}
