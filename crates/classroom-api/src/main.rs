//! Classroom registrar API server entry point.

use std::sync::Arc;

use classroom_api::config::Config;
use classroom_api::error::AppError;
use classroom_api::state::{AppState, EventBus};
use classroom_core::clock::SystemClock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting classroom registrar API server");

    let config = Config::from_env()?;
    let addr = config.socket_addr()?;

    let bus = EventBus::new(config.bus_mode, config.async_bus);
    let app_state = AppState::new(Arc::new(SystemClock), bus.clone());

    let app = classroom_api::app(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    tracing::info!(bus = config.bus_mode.as_str(), "Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Drain deliveries still queued for the projections.
    bus.shutdown().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
