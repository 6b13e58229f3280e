//! Assistant Platform HTTP Proxy
//!
//! A thin proxy in front of a vector-assistant platform, built with Tokio
//! and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌───────────────────────────────────────────────┐
//!                      │                ASSISTANT PROXY                │
//!                      │                                               │
//!   Client Request     │  ┌─────────┐   ┌──────────┐   ┌───────────┐  │
//!   ──────────────────▶│  │  http   │──▶│ security │──▶│  actions  │  │
//!                      │  │ server  │   │cors+auth │   │  router   │  │
//!                      │  └─────────┘   └──────────┘   └─────┬─────┘  │
//!                      │                                     │        │
//!                      │                                     ▼        │
//!                      │                ┌──────────┐   ┌───────────┐  │     Assistant
//!   Client Response    │  ┌─────────┐   │ upstream │◀──│ upstream  │──┼───▶ Platform
//!   ◀──────────────────┼──│envelope │◀──│ dispatch │   │ resolver  │  │     (control +
//!                      │  └─────────┘   │ + retry  │   │ + cache   │  │      data plane)
//!                      │                └──────────┘   └───────────┘  │
//!                      │                                               │
//!                      │  ┌─────────────────────────────────────────┐ │
//!                      │  │   config · observability · error model  │ │
//!                      │  └─────────────────────────────────────────┘ │
//!                      └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use assistant_proxy::config::load_config;
use assistant_proxy::http::HttpServer;
use assistant_proxy::observability;

#[derive(Parser)]
#[command(name = "assistant-proxy")]
#[command(about = "HTTP proxy for a vector-assistant platform", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Environment variables override
    /// the file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration (file + environment overrides)
    let config = load_config(args.config.as_deref())?;

    // Initialize tracing subscriber
    observability::logging::init(&config.observability.log_level);

    tracing::info!("assistant-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        control_plane = %config.upstream.control_plane_url,
        api_version = %config.upstream.api_version,
        host_cache_ttl_secs = config.host_cache.ttl_secs,
        max_retries = config.retries.max_retries,
        auth_enabled = !config.auth.bearer_token.is_empty(),
        "Configuration loaded"
    );

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    // Initialize metrics server
    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // Create and run HTTP server
    let server = HttpServer::new(config)?;
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
