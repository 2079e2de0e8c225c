//! Path-consuming HTTP router.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server ──▶ routing::table ──▶ routing::router
//!                          │                                   │
//!                          │                      cursor / dispatcher / cache
//!                          ▼                                   │
//!     Client Response ◀── http::response ◀── Outcome ◀─────────┘
//!
//!     Cross-cutting: config (load, validate, watch), observability
//!     (tracing, prometheus), lifecycle (signals, shutdown)
//! ```
//!
//! The route file is TOML. Without `--config` the server starts with an
//! empty table and answers every request with 404.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use path_router::config::{load_config, ConfigWatcher, RouterConfig};
use path_router::lifecycle::{wait_for_termination, Shutdown};
use path_router::observability::{logging, metrics};
use path_router::HttpServer;

#[derive(Parser)]
#[command(name = "path-router")]
#[command(about = "HTTP server driven by a path-consuming route table", long_about = None)]
struct Args {
    /// Route file (TOML). Watched for changes when given.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);
    tracing::info!("path-router v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        request_timeout_secs = config.listener.request_timeout_secs,
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

    // The watcher must outlive the server.
    let (_watcher, config_updates) = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        None => {
            let (_tx, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    tokio::spawn(wait_for_termination(shutdown.clone()));

    let server = HttpServer::new(config)?;
    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
