//! HTTP server setup and routing
//!
//! Sets up the axum router for the control endpoints and SSE, and runs it
//! until the given shutdown future resolves.

use crate::error::{Error, Result};
use crate::playback::PlayerHandle;
use axum::{
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use url::Url;
use vamp_common::Playlist;

/// Shared application context passed to all handlers
#[derive(Clone)]
pub struct AppContext {
    pub player: PlayerHandle,
    pub playlist: Arc<Playlist>,
    /// Mirrored page location, when one is attached
    pub location: Option<watch::Receiver<Url>>,
}

/// Build the router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    Router::new()
        .route("/health", get(super::handlers::health))
        // Playback control
        .route("/playback/state", get(super::handlers::get_playback_state))
        .route("/playback/playlist", get(super::handlers::get_playlist))
        .route("/playback/toggle", post(super::handlers::toggle))
        .route("/playback/next", post(super::handlers::skip_next))
        .route("/playback/previous", post(super::handlers::skip_previous))
        .route("/playback/jump", post(super::handlers::jump))
        .route("/location", get(super::handlers::get_location))
        // SSE event stream
        .route("/events", get(super::sse::event_stream))
        .with_state(ctx)
        .layer(TraceLayer::new_for_http())
        // Enable CORS for local access
        .layer(CorsLayer::permissive())
}

/// Run the HTTP API server until `shutdown` resolves
pub async fn run(
    port: u16,
    ctx: AppContext,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let app = create_router(ctx);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Http(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| Error::Http(format!("Server error: {}", e)))?;

    info!("HTTP server stopped");
    Ok(())
}
