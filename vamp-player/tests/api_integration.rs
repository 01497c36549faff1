//! Integration tests for the VAMP Player HTTP API
//!
//! Drives the router in-process through `tower::ServiceExt::oneshot`.

mod helpers;

use axum::body::Body;
use axum::http::StatusCode;
use helpers::{playlist, TestPlayer};
use http::{Method, Request};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;
use vamp_player::api::{create_router, AppContext};

fn setup_test_router(t: &TestPlayer, len: usize) -> axum::Router {
    create_router(AppContext {
        player: t.player.clone(),
        playlist: playlist(len),
        location: Some(t.location.clone()),
    })
}

/// Helper function to make HTTP requests to the test router
async fn make_request(
    app: &axum::Router,
    method: Method,
    path: &str,
    body: Option<Value>,
) -> (StatusCode, Option<Value>) {
    let request = Request::builder().method(method).uri(path);
    let request = match body {
        Some(json_body) => request
            .header("content-type", "application/json")
            .body(Body::from(json_body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    let json_body = if bytes.is_empty() {
        None
    } else {
        Some(serde_json::from_slice(&bytes).unwrap())
    };
    (status, json_body)
}

#[tokio::test]
async fn test_health_endpoint() {
    let t = TestPlayer::spawn(3);
    let app = setup_test_router(&t, 3);

    let (status, body) = make_request(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    let body = body.expect("Expected response body");
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["module"], "vamp-player");
    assert!(body["version"].is_string());
}

#[tokio::test(start_paused = true)]
async fn test_playback_state_endpoint() {
    let t = TestPlayer::spawn(3);
    let app = setup_test_router(&t, 3);

    let (status, body) = make_request(&app, Method::GET, "/playback/state", None).await;

    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["current_index"], 0);
    assert_eq!(body["track_number"], 1);
    assert_eq!(body["total_count"], 3);
    assert_eq!(body["is_playing"], false);
    assert_eq!(body["current_track"]["title"], "Track 1");
    assert_eq!(body["theme"]["primary"]["color"], "blue");
}

#[tokio::test(start_paused = true)]
async fn test_playlist_endpoint() {
    let t = TestPlayer::spawn(3);
    let app = setup_test_router(&t, 3);

    let (status, body) = make_request(&app, Method::GET, "/playback/playlist", None).await;

    assert_eq!(status, StatusCode::OK);
    let tracks = body.unwrap();
    let tracks = tracks.as_array().unwrap();
    assert_eq!(tracks.len(), 3);
    assert_eq!(tracks[1]["audio"], "a1.mp3");
    assert_eq!(tracks[1]["ui_color"]["primary"], "purple");
}

#[tokio::test(start_paused = true)]
async fn test_toggle_and_navigation() {
    let t = TestPlayer::spawn(3);
    let app = setup_test_router(&t, 3);

    let (status, body) = make_request(&app, Method::POST, "/playback/toggle", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["is_playing"], true);

    // Response reflects the immediate pause; the resume follows the delay
    let (status, body) = make_request(&app, Method::POST, "/playback/next", None).await;
    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["current_index"], 1);
    assert_eq!(body["is_playing"], false);

    tokio::time::sleep(Duration::from_millis(150)).await;
    let (_, body) = make_request(&app, Method::GET, "/playback/state", None).await;
    assert_eq!(body.unwrap()["is_playing"], true);

    let (status, body) = make_request(&app, Method::POST, "/playback/previous", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["current_index"], 0);

    let (status, body) = make_request(&app, Method::POST, "/playback/previous", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["current_index"], 2);
}

#[tokio::test(start_paused = true)]
async fn test_jump_endpoint_wraps() {
    let t = TestPlayer::spawn(3);
    let app = setup_test_router(&t, 3);

    let (status, body) =
        make_request(&app, Method::POST, "/playback/jump", Some(json!({ "index": 4 }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["current_index"], 1);
}

#[tokio::test(start_paused = true)]
async fn test_rejected_toggle_returns_conflict() {
    let t = TestPlayer::spawn(3);
    t.audio.reject_play(true);
    let app = setup_test_router(&t, 3);

    let (status, body) = make_request(&app, Method::POST, "/playback/toggle", None).await;

    assert_eq!(status, StatusCode::CONFLICT);
    let body = body.unwrap();
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("rejected play"));

    let (_, body) = make_request(&app, Method::GET, "/playback/state", None).await;
    assert_eq!(body.unwrap()["is_playing"], false);
}

#[tokio::test(start_paused = true)]
async fn test_location_endpoint() {
    let t = TestPlayer::spawn(3);
    let app = setup_test_router(&t, 3);

    make_request(&app, Method::POST, "/playback/next", None).await;
    let (status, body) = make_request(&app, Method::GET, "/location", None).await;

    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["url"], "http://localhost/?track=2");
    assert_eq!(body["track"], 2);
}

#[tokio::test(start_paused = true)]
async fn test_location_endpoint_without_location() {
    let t = TestPlayer::spawn(3);
    let app = create_router(AppContext {
        player: t.player.clone(),
        playlist: playlist(3),
        location: None,
    });

    let (status, _) = make_request(&app, Method::GET, "/location", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test(start_paused = true)]
async fn test_stopped_player_returns_unavailable() {
    let t = TestPlayer::spawn(3);
    let app = setup_test_router(&t, 3);
    t.player.shutdown().await.unwrap();

    let (status, body) = make_request(&app, Method::POST, "/playback/next", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body.unwrap()["status"], "error");

    let (status, _) = make_request(&app, Method::GET, "/playback/state", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
