//! Telegram Bot API relay.
//!
//! A transparent single-upstream HTTP relay built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌───────────────────────────────────────────────┐
//!                    │                  TG RELAY                     │
//!                    │                                               │
//!   Client Request   │  ┌────────┐   ┌───────────┐   ┌───────────┐  │
//!   ─────────────────┼─▶│  http  │──▶│  request  │──▶│ transport │──┼──▶ api.telegram.org
//!                    │  │ server │   │ translate │   │ executor  │  │
//!                    │  └────────┘   └───────────┘   └─────┬─────┘  │
//!                    │                                     │        │
//!   Client Response  │  ┌──────────┐                       │        │
//!   ◀────────────────┼──│ response │◀──────────────────────┘        │
//!                    │  │  emit    │                                │
//!                    │  └──────────┘                                │
//!                    │                                               │
//!                    │  ┌──────────────────────────────────────────┐│
//!                    │  │  config  │  diagnostics  │  tracing      ││
//!                    │  └──────────────────────────────────────────┘│
//!                    └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tg_relay::config::{load_config, RelayConfig};
use tg_relay::http::HttpServer;
use tg_relay::lifecycle::Shutdown;

#[derive(Debug, Parser)]
#[command(name = "tg-relay", about = "Transparent HTTP relay for the Telegram Bot API")]
struct Args {
    /// Path to the TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tg_relay=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("tg-relay v0.1.0 starting");

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => RelayConfig::default(),
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        mount_prefix = %config.upstream.mount_prefix,
        diagnostics = config.diagnostics.enabled,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(address = %local_addr, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
