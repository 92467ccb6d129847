//! Sedulur Rasa - mental-health companion chatbot
//!
//! A guided conversation backed by a Rasa dialogue server, a 25-question
//! self-assessment and a results dashboard, served over HTTP.

mod api;
mod assessment;
mod complaint;
mod config;
mod insights;
mod responder;
mod runtime;
mod state_machine;
mod storage;

use api::{create_router, AppState};
use config::AppConfig;
use responder::ResponseProvider;
use runtime::SessionManager;
use std::net::SocketAddr;
use std::sync::Arc;
use storage::JsonResultStore;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sedulur_rasa=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = AppConfig::from_env();
    std::fs::create_dir_all(config.chat_dir())?;
    tracing::info!(path = %config.data_dir().display(), "Using data directory");

    let provider = config.responder.build()?;
    tracing::info!(
        provider = provider.name(),
        url = %config.responder.rasa_url,
        timeout_secs = config.responder.reply_timeout.as_secs(),
        "Response provider ready"
    );

    let sessions = SessionManager::new(
        config.chat_dir(),
        provider,
        config.responder.reply_timeout,
    )
    .with_limits(config.sessions);
    tracing::info!(
        idle_secs = config.sessions.idle_timeout.as_secs(),
        max_live = config.sessions.max_live,
        "Session limits"
    );
    let results = Arc::new(JsonResultStore::new(config.results_path()));
    tracing::info!(path = %results.path().display(), "Using results collection");
    let state = AppState::new(sessions, results);

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(cors)
        .layer(compression)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Sedulur Rasa server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
