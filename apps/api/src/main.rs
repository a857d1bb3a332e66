mod config;
mod documents;
mod errors;
mod gateway;
mod routes;
mod session;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::gateway::transport::HttpTransport;
use crate::gateway::AiGateway;
use crate::routes::build_router;
use crate::session::SessionRegistry;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Folio API v{}", env!("CARGO_PKG_VERSION"));

    // Gateway template cloned into every new session
    let mut gateway = AiGateway::new(
        Arc::new(HttpTransport::new()),
        &config.inference_base_url,
        &config.inference_model,
    );
    if let Some(key) = &config.huggingface_api_key {
        gateway.configure(key.clone());
        info!("Default AI credential loaded from environment");
    }
    info!("AI gateway endpoint: {}", gateway.endpoint());

    let sessions = SessionRegistry::new(
        gateway,
        Duration::from_secs(config.session_idle_timeout_secs),
    );
    info!(
        "Session registry initialized (idle timeout: {}s)",
        config.session_idle_timeout_secs
    );

    let state = AppState {
        sessions,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the UI has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
