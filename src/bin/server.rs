//! IVC HTTP Server Binary
//!
//! This is the main entry point for the IVC REST API server.
//! It connects to the worksheet store, sets up the HTTP router, and starts
//! serving requests.
//!
//! # Usage
//!
//! ```bash
//! # Run with the local (in-memory) workbook (default)
//! cargo run --bin ivc-server --features "local-store,http-server"
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `IVC_CONFIG`: Optional path to a TOML configuration file
//! - `IVC_ROSTER_SHEET` / `IVC_METRICS_SHEET`: Worksheet titles
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use ivc_rust::http::{create_router, AppState};
use ivc_rust::store::{AppConfig, LocalWorkbook, WorkbookStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting IVC HTTP Server");

    let config = AppConfig::load()
        .map_err(|e| anyhow::anyhow!(e.to_string()))
        .context("Failed to load configuration")?;

    // The local workbook is the only in-tree backend; remote transports
    // plug in behind the WorkbookStore trait.
    let workbook = LocalWorkbook::new(&[
        config.workbook.roster_sheet.as_str(),
        config.workbook.metrics_sheet.as_str(),
    ]);

    let state = AppState::initialize(Arc::new(workbook) as Arc<dyn WorkbookStore>, &config)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))
        .context("Failed to initialize application state")?;
    info!("Worksheet store authorized and caches wired");

    // Create router with all endpoints
    let app = create_router(state);

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);
    info!("API documentation: http://{}/health", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
