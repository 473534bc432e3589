mod ai;
mod board;
mod config;
mod errors;
mod models;
mod routes;
mod search;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ai::GeminiClient;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{InMemoryStore, JobStore, PgStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Job Board API v{}", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn JobStore> = match &config.database_url {
        Some(url) => Arc::new(PgStore::connect(url, config.database_max_connections).await?),
        None => {
            warn!("DATABASE_URL not set, using in-memory store (data is lost on exit)");
            Arc::new(InMemoryStore::seeded())
        }
    };

    let gemini = GeminiClient::new(config.gemini_api_key.clone());
    if gemini.is_configured() {
        info!("AI client initialized (match model: {})", ai::gemini::MATCH_MODEL);
    } else {
        warn!("GEMINI_API_KEY not set, AI features will degrade");
    }

    let state = AppState {
        store: store.clone(),
        ai: Arc::new(gemini),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
