//! Cookie-sync partner relay (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌────────────────────────────────────────────────────┐
//!                  │                   PARTNER RELAY                    │
//!  Client Request  │  ┌────────┐   ┌──────────┐   ┌──────────────────┐  │
//! ─────────────────┼─▶│  CORS  │──▶│ identity │──▶│ routes           │  │
//!                  │  │ policy │   │  cookie  │   │                  │  │
//!                  │  └────────┘   └──────────┘   │ /track   ──┐     │  │
//!                  │                              │ /adwork  ──┴▶ fwd┼──┼──▶ Upstreams
//!                  │                              │ /bidding         │  │
//!                  │                              │ /partnerAd/*     │  │
//!  Client Response │                              │ * fallback       │  │
//! ◀────────────────┼──────────────────────────────┴──────────────────┘  │
//!                  │                                                    │
//!                  │  config, logging/metrics, timeouts, lifecycle      │
//!                  └────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use cookie_sync_relay::config::resolve_config;
use cookie_sync_relay::lifecycle::{signals, Shutdown};
use cookie_sync_relay::observability::{logging, metrics};
use cookie_sync_relay::HttpServer;

#[derive(Parser)]
#[command(name = "cookie-sync-relay")]
#[command(about = "Cookie-sync partner relay", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listening port; overrides the config file.
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = resolve_config(cli.config.as_deref(), cli.port)?;

    logging::init_logging(&config.observability);
    tracing::info!("cookie-sync-relay v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address(),
        audience_sync_url = %config.upstream.audience_sync_url,
        mainframe_sync_url = %config.upstream.mainframe_sync_url,
        response_timeout_ms = config.upstream.response_timeout_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Partner host listening");

    let shutdown = Shutdown::new();
    tokio::spawn(signals::shutdown_on_signal(shutdown.clone()));

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
