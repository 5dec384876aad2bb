mod api;
mod dataset;
mod models;
mod solver;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_MAX_LEVEL: u16 = 100;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stress_engine=debug,tower_http=debug,axum=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Stress Engine Service");

    // The building model is capped at this height; requests past it are
    // clamped, which is what the dashboard's truncation warning surfaces.
    let max_level = std::env::var("ENGINE_MAX_LEVEL")
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(DEFAULT_MAX_LEVEL);

    tracing::info!("Generating building model with {} levels", max_level);
    let state = api::AppState::new(max_level);

    // Build application router
    let app = api::create_router(state);

    // Bind to address
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8084".to_string());
    let addr = format!("{}:{}", host, port);

    tracing::info!("Listening on {}", addr);
    tracing::info!("API endpoints:");
    tracing::info!("  GET  /health");
    tracing::info!("  GET  /api/v1/sections");
    tracing::info!("  GET  /api/v1/forces");
    tracing::info!("  GET  /api/v1/stress-results");
    tracing::info!("  POST /api/v1/calculate");

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
