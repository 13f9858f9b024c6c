// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Foreground HTTP server command

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use apphost_core::application::AppLifecycleService;
use apphost_core::domain::config::ServiceConfig;
use apphost_core::domain::validation::AppValidator;
use apphost_core::infrastructure::InMemoryAppRegistry;
use apphost_core::presentation::api;

pub async fn run(
    config_path: Option<PathBuf>,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<()> {
    // Load configuration
    let mut config =
        ServiceConfig::load_or_default(config_path).context("Failed to load configuration")?;

    if let Some(host) = host_override {
        config.host = host;
    }
    if let Some(port) = port_override {
        config.port = port;
    }

    // Fail fast: nothing is constructed on invalid config.
    config
        .validate()
        .context("Configuration validation failed")?;

    info!("Configuration loaded: service_name={}", config.service_name);

    // Initialize services with explicit construction, no globals
    let registry = Arc::new(InMemoryAppRegistry::new());
    let lifecycle = Arc::new(AppLifecycleService::new(registry, AppValidator::new()));

    let app = api::app(lifecycle, config.service_name.clone());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("APPHOST listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("APPHOST shutting down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
