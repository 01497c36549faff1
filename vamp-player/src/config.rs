//! Configuration for the vamp-player service
//!
//! Bootstrap settings come from a TOML file; every key has a built-in
//! default so the file itself is optional.
//!
//! # Settings Sources Priority
//!
//! 1. Command-line arguments (--port, --playlist, --track)
//! 2. Environment variables (VAMP_CONFIG, VAMP_PORT)
//! 3. TOML configuration file
//! 4. Built-in defaults (code constants)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;
use vamp_common::config::load_toml_or_default;
use vamp_common::time::millis_to_duration;

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Playlist file (required unless given on the command line)
    #[serde(default)]
    pub playlist: Option<PathBuf>,

    /// Page location mirrored by the location sync
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Controller tuning (optional)
    #[serde(default)]
    pub playback: PlaybackSettings,

    /// Headless sink behavior (optional)
    #[serde(default)]
    pub simulation: SimulationSettings,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            playlist: None,
            base_url: default_base_url(),
            logging: LoggingConfig::default(),
            playback: PlaybackSettings::default(),
            simulation: SimulationSettings::default(),
        }
    }
}

impl TomlConfig {
    /// Load from an optional file, falling back to defaults when none is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config: Self = load_toml_or_default(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the player cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.simulation.track_length_ms == 0 {
            // Every track would end on arrival and auto-advance forever
            return Err(Error::Config(
                "simulation.track_length_ms must be greater than 0".to_string(),
            ));
        }
        if self.playback.event_capacity == 0 {
            return Err(Error::Config(
                "playback.event_capacity must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Parsed base URL for the location sync
    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("Invalid base_url '{}': {}", self.base_url, e)))
    }

    /// Playlist path, or an error when none was configured
    pub fn playlist_path(&self) -> Result<&Path> {
        self.playlist
            .as_deref()
            .ok_or_else(|| Error::Config("No playlist configured (use --playlist)".to_string()))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Playback controller settings
#[derive(Debug, Clone, Deserialize)]
pub struct PlaybackSettings {
    /// Settle delay between a track change and the resume step
    #[serde(default = "default_resume_delay_ms")]
    pub resume_delay_ms: u64,

    /// Also wait for the audio sink's readiness signal before resuming
    #[serde(default)]
    pub await_audio_ready: bool,

    /// Upper bound on a single sink play attempt
    #[serde(default = "default_play_timeout_ms")]
    pub play_timeout_ms: u64,

    /// EventBus channel capacity
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            resume_delay_ms: default_resume_delay_ms(),
            await_audio_ready: false,
            play_timeout_ms: default_play_timeout_ms(),
            event_capacity: default_event_capacity(),
        }
    }
}

impl PlaybackSettings {
    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            resume_delay: millis_to_duration(self.resume_delay_ms),
            await_audio_ready: self.await_audio_ready,
            play_timeout: millis_to_duration(self.play_timeout_ms),
        }
    }
}

/// Headless sink settings
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationSettings {
    /// Length of every simulated track
    #[serde(default = "default_track_length_ms")]
    pub track_length_ms: u64,

    /// Delay between sourcing a sink and its readiness signal
    #[serde(default = "default_load_latency_ms")]
    pub load_latency_ms: u64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            track_length_ms: default_track_length_ms(),
            load_latency_ms: default_load_latency_ms(),
        }
    }
}

/// Runtime controller parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Settle delay before the resume step runs
    pub resume_delay: Duration,
    /// Resume additionally waits for the audio sink's readiness signal
    pub await_audio_ready: bool,
    /// A play attempt that has not resolved by then counts as rejected
    pub play_timeout: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        PlaybackSettings::default().controller_config()
    }
}

fn default_port() -> u16 {
    5790
}

fn default_base_url() -> String {
    format!("http://localhost:{}/", default_port())
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_resume_delay_ms() -> u64 {
    100
}

fn default_play_timeout_ms() -> u64 {
    5000
}

fn default_event_capacity() -> usize {
    100
}

fn default_track_length_ms() -> u64 {
    180_000
}

fn default_load_latency_ms() -> u64 {
    50
}
