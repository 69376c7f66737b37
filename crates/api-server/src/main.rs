//! API Server for the checklist service
//!
//! This is the main entry point. It serves the checklist REST API on the
//! configured address (default 0.0.0.0:8085).

mod config;
mod routes;
mod state;

use anyhow::Context;
use axum::{http::StatusCode, Router};
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, LogFormat, DEFAULT_CONFIG_FILE};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path =
        std::env::var("TODO_CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
    let config = Config::load(&config_path)
        .with_context(|| format!("could not load config from {}", config_path))?;

    init_tracing(config.log_format);
    tracing::debug!("Loaded config: {:?}", config);

    let app_state = AppState::new(&config.storage)
        .await
        .context("could not initialize task storage")?;
    tracing::info!("Using {} task storage", app_state.storage());

    let app = app(app_state, config.request_timeout);

    let listener = tokio::net::TcpListener::bind(config.server_address)
        .await
        .with_context(|| format!("could not bind {}", config.server_address))?;
    tracing::info!("REST API listening on {}", config.server_address);

    let shutdown = Arc::new(Notify::new());
    let server = {
        let shutdown = Arc::clone(&shutdown);
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { shutdown.notified().await })
            .into_future()
    };
    let mut server = tokio::spawn(server);

    tokio::select! {
        result = &mut server => {
            result.context("server task panicked")?.context("server failed")?;
            return Ok(());
        }
        _ = shutdown_signal() => {}
    }

    tracing::info!(
        "Shutting down, waiting up to {:?} for open requests",
        config.graceful_shutdown_timeout
    );
    shutdown.notify_one();

    match tokio::time::timeout(config.graceful_shutdown_timeout, server).await {
        Ok(result) => result.context("server task panicked")?.context("server failed")?,
        Err(_) => tracing::warn!("Graceful shutdown timed out, dropping open connections"),
    }

    tracing::info!("Terminated");
    Ok(())
}

/// The API router with its middleware stack
fn app(state: AppState, request_timeout: Duration) -> Router {
    routes::router()
        .with_state(state)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "todo_api=debug,todo_core=info,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl-C"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }
}
