mod brand_voice;
mod catalog;
mod config;
mod errors;
mod generation;
mod library;
mod models;
mod platforms;
mod review;
mod routes;
mod session;
mod state;
mod upstream;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::upstream::HttpBackend;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
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

    info!("Starting Studio API v{}", env!("CARGO_PKG_VERSION"));

    // Upstream endpoints (generation, library, catalog, ad platform, brand voice)
    let backend = Arc::new(HttpBackend::new(
        config.upstream_base_url.clone(),
        config.upstream_api_key.clone(),
        Duration::from_secs(config.upstream_timeout_secs),
    ));
    info!(
        "Upstream client initialized (base: {}, timeout: {}s)",
        config.upstream_base_url, config.upstream_timeout_secs
    );

    let state = AppState::new(config.clone(), backend);

    // Browsers that leave without deleting their session are cleaned up here
    let idle_ttl = Duration::from_secs(config.session_idle_ttl_secs);
    let sweep_every = idle_ttl.clamp(Duration::from_secs(1), Duration::from_secs(60));
    state.sessions.spawn_sweeper(idle_ttl, sweep_every);
    info!("Session sweeper started (idle ttl: {}s)", config.session_idle_ttl_secs);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
