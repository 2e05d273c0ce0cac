//! Access gate service.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌────────────────────────────────────────────────────┐
//!                      │                   ACCESS GATE                      │
//!                      │                                                    │
//!   Client Request     │  ┌─────────┐   ┌──────────┐   ┌─────────────────┐  │
//!   ───────────────────┼─▶│  http   │──▶│ identity │──▶│     routing     │  │
//!                      │  │ server  │   │  lookup  │   │   classifier    │  │
//!                      │  └─────────┘   └──────────┘   └────────┬────────┘  │
//!                      │                                        ▼           │
//!                      │                               ┌─────────────────┐  │
//!   307 Redirect       │                               │     access      │  │
//!   ◀──────────────────┼───────────────────────────────│ decision table  │  │
//!                      │                               └────────┬────────┘  │
//!                      │                                        ▼ allow     │
//!   Client Response    │                               ┌─────────────────┐  │
//!   ◀──────────────────┼───────────────────────────────│ upstream proxy  │◀─┼── Application
//!                      │                               └─────────────────┘  │
//!                      └────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use tenant_gate::config::{load_config, watcher::ConfigWatcher, GateConfig};
use tenant_gate::lifecycle::{shutdown_on_signal, Shutdown};
use tenant_gate::observability::{logging, metrics};
use tenant_gate::GateServer;

#[derive(Parser)]
#[command(name = "tenant-gate")]
#[command(about = "Access-control routing gate", long_about = None)]
struct Args {
    /// Path to the TOML configuration file. Defaults are used when omitted.
    #[arg(short, long, env = "TENANT_GATE_CONFIG")]
    config: Option<PathBuf>,

    /// Reload the routing policy when the config file changes.
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GateConfig::default(),
    };

    logging::init_logging(&config.observability)?;
    tracing::info!("tenant-gate v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.address,
        identity_mode = ?config.identity.mode,
        identity_timeout_ms = config.identity.timeout_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // The watcher handle must outlive the server.
    let (_watcher, config_updates) = match (&args.config, args.watch) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        _ => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    let server_shutdown = shutdown.subscribe();
    let server = GateServer::new(config)?;

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = shutdown_on_signal(&signal_shutdown).await {
            tracing::error!(error = %e, "Failed to install signal handlers");
        }
    });

    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
