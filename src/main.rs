// SPDX-License-Identifier: MIT
// Copyright 2026 Marathon Calendar contributors

//! Marathon Calendar API Server
//!
//! Serves the race catalog, favorites and planning status, and the daily
//! reminder trigger called by Cloud Scheduler.

use marathon_calendar::{config::Config, init_logging, AppState};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Marathon Calendar API");

    let port = config.port;
    let state = Arc::new(AppState::initialize(config).await?);
    tracing::info!(races = state.catalog.len(), "Application state initialized");

    // Build router
    let app = marathon_calendar::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
