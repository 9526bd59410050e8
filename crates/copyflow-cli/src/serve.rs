//! `copyflow serve` — run the HTTP API until Ctrl+C.
//!
//! Startup sequence:
//! 1. Load config
//! 2. Build registry → dispatcher → studio
//! 3. Bind the listener
//! 4. Serve until Ctrl+C, letting in-flight requests finish

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use tokio::net::TcpListener;
use tracing::warn;

use copyflow_api::{serve, shutdown_signal, AppState};
use copyflow_core::config::load_config;

use crate::helpers;

pub async fn run(config_path: Option<&Path>, host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = load_config(config_path);
    let studio = helpers::build_studio(&config)?;

    if studio.registry().default_selection().is_none() {
        warn!("No provider has an API key; generation requests will fail");
    }

    let host = host.unwrap_or(config.server.host);
    let port = port.unwrap_or(config.server.port);
    let listener = TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("failed to bind {host}:{port}"))?;
    let addr = listener.local_addr().context("listener has no local address")?;

    helpers::print_banner();
    println!("  Mode: HTTP API");
    println!("  Listening on {}", format!("http://{addr}").cyan());
    println!("  {}", "Press Ctrl+C to stop.".dimmed());
    println!();

    serve(listener, AppState::new(studio), shutdown_signal())
        .await
        .context("HTTP server failed")?;

    println!("{}", "  Stopped.".dimmed());
    Ok(())
}
