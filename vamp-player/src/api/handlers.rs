//! HTTP request handlers
//!
//! Every command handler answers with the view as it stands right after the
//! command was applied. Resume steps scheduled by a track change are not
//! awaited; watch `/events` for the intent flip.

use crate::api::server::AppContext;
use crate::error::Error;
use crate::location::track_param;
use crate::playback::PlayerView;
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use vamp_common::Playlist;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    module: String,
    version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct JumpRequest {
    index: usize,
}

#[derive(Debug, Serialize)]
pub struct LocationResponse {
    url: String,
    /// Parsed track number, absent when the parameter is missing or not numeric
    track: Option<i64>,
}

type ApiError = (StatusCode, Json<StatusResponse>);

fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(StatusResponse {
            status: "error".to_string(),
            message: message.into(),
        }),
    )
}

/// Map a player error onto an HTTP status
fn player_error(err: Error) -> ApiError {
    match err {
        Error::ControllerGone => {
            warn!("Request rejected: player is not running");
            error_response(StatusCode::SERVICE_UNAVAILABLE, err.to_string())
        }
        Error::Playback(_) => error_response(StatusCode::CONFLICT, err.to_string()),
        other => {
            error!("Player command failed: {}", other);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    }
}

// ============================================================================
// Health Endpoint
// ============================================================================

/// GET /health - Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        module: "vamp-player".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Playback Endpoints
// ============================================================================

/// GET /playback/state - Current display snapshot
pub async fn get_playback_state(
    State(ctx): State<AppContext>,
) -> Result<Json<PlayerView>, ApiError> {
    if !ctx.player.is_running() {
        return Err(player_error(Error::ControllerGone));
    }
    Ok(Json(ctx.player.view()))
}

/// GET /playback/playlist - The full playlist
pub async fn get_playlist(State(ctx): State<AppContext>) -> Json<Playlist> {
    Json(ctx.playlist.as_ref().clone())
}

/// POST /playback/toggle - Flip play/pause
pub async fn toggle(State(ctx): State<AppContext>) -> Result<Json<PlayerView>, ApiError> {
    info!("Toggle request");
    ctx.player.toggle_playback().await.map(Json).map_err(player_error)
}

/// POST /playback/next - Skip to the following track
pub async fn skip_next(State(ctx): State<AppContext>) -> Result<Json<PlayerView>, ApiError> {
    info!("Skip next request");
    ctx.player.next().await.map(Json).map_err(player_error)
}

/// POST /playback/previous - Go back one track
pub async fn skip_previous(
    State(ctx): State<AppContext>,
) -> Result<Json<PlayerView>, ApiError> {
    info!("Skip previous request");
    ctx.player.previous().await.map(Json).map_err(player_error)
}

/// POST /playback/jump - Select a playlist position directly
pub async fn jump(
    State(ctx): State<AppContext>,
    Json(req): Json<JumpRequest>,
) -> Result<Json<PlayerView>, ApiError> {
    info!("Jump request: index {}", req.index);
    ctx.player.advance_to(req.index).await.map(Json).map_err(player_error)
}

// ============================================================================
// Location Endpoint
// ============================================================================

/// GET /location - The mirrored page location
pub async fn get_location(
    State(ctx): State<AppContext>,
) -> Result<Json<LocationResponse>, ApiError> {
    let Some(location) = ctx.location.as_ref() else {
        return Err(error_response(StatusCode::NOT_FOUND, "No location attached"));
    };
    let url = location.borrow().clone();
    Ok(Json(LocationResponse {
        track: track_param(&url),
        url: url.to_string(),
    }))
}
