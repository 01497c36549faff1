//! VAMP Player (vamp-player) - Main entry point
//!
//! Runs the player core headless with clock-driven sinks and exposes the
//! HTTP/SSE control surface.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use vamp_common::config::{resolve_config_path, CONFIG_ENV_VAR};
use vamp_common::events::EventBus;
use vamp_common::Playlist;
use vamp_player::api::{self, AppContext};
use vamp_player::config::TomlConfig;
use vamp_player::location::{set_query_param, QueryLocation, TRACK_PARAM};
use vamp_player::media::{ClockSettings, ClockSink, MediaHandlePair, SinkRole};
use vamp_player::PlaybackController;

/// Command-line arguments for vamp-player
#[derive(Parser, Debug)]
#[command(name = "vamp-player")]
#[command(about = "Playlist-driven video + audio player")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config file)
    #[arg(short, long, env = "VAMP_PORT")]
    port: Option<u16>,

    /// Playlist file (overrides config file)
    #[arg(long)]
    playlist: Option<PathBuf>,

    /// Initial 1-based track number
    #[arg(short, long)]
    track: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Step 1: configuration (needed for the log level)
    let config_path = resolve_config_path(args.config.as_deref(), CONFIG_ENV_VAR);
    let config = TomlConfig::load(config_path.as_deref())
        .context("Failed to load configuration")?;

    // Step 2: tracing
    let default_filter = format!("vamp_player={},tower_http=info", config.logging.level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting VAMP Player v{}", env!("CARGO_PKG_VERSION"));
    match &config_path {
        Some(path) => info!("Configuration: {}", path.display()),
        None => info!("Configuration: built-in defaults"),
    }

    if let Err(e) = run(args, config).await {
        error!("Player failed: {:#}", e);
        return Err(e);
    }
    Ok(())
}

async fn run(args: Args, config: TomlConfig) -> Result<()> {
    let port = args.port.unwrap_or(config.port);

    // Step 3: playlist
    let playlist_path = match args.playlist {
        Some(path) => path,
        None => config.playlist_path()?.to_path_buf(),
    };
    let playlist = Arc::new(
        Playlist::load(&playlist_path)
            .with_context(|| format!("Failed to load playlist {}", playlist_path.display()))?,
    );
    info!(
        "Loaded playlist {} ({} tracks)",
        playlist_path.display(),
        playlist.len()
    );

    // Step 4: location, seeded from --track
    let mut base_url: Url = config.base_url()?;
    if let Some(track) = &args.track {
        set_query_param(&mut base_url, TRACK_PARAM, track);
    }
    let location = QueryLocation::new(base_url);
    let location_rx = location.subscribe();

    // Step 5: sinks and controller
    let clock = ClockSettings {
        track_length: vamp_common::time::millis_to_duration(config.simulation.track_length_ms),
        load_latency: vamp_common::time::millis_to_duration(config.simulation.load_latency_ms),
    };
    let pair = MediaHandlePair::new(
        ClockSink::boxed(SinkRole::Video, clock),
        ClockSink::boxed(SinkRole::Audio, clock),
    )?;
    let events = Arc::new(EventBus::new(config.playback.event_capacity));
    let player = PlaybackController::spawn(
        Arc::clone(&playlist),
        pair,
        Box::new(location),
        config.playback.controller_config(),
        events,
    )?;

    // Step 6: HTTP server until a shutdown signal arrives
    let ctx = AppContext {
        player: player.clone(),
        playlist,
        location: Some(location_rx),
    };
    api::run(port, ctx, shutdown_signal())
        .await
        .context("HTTP server failed")?;

    player.shutdown().await?;
    info!("Shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
