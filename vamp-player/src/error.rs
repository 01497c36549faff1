//! Error types for vamp-player
//!
//! Defines module-specific error types using thiserror for clear error propagation.

use crate::media::SinkError;
use thiserror::Error;

/// Main error type for vamp-player
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file loading errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Playlist or shared configuration errors
    #[error(transparent)]
    Common(#[from] vamp_common::Error),

    /// A sink refused to play or could not load its source
    ///
    /// Non-fatal: the controller stays usable with intent paused.
    #[error("Playback failed: {0}")]
    Playback(#[from] SinkError),

    /// The controller task has shut down
    #[error("Playback controller is not running")]
    ControllerGone,

    /// Invalid state for operation
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// HTTP server errors
    #[error("HTTP server error: {0}")]
    Http(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type using vamp-player Error
pub type Result<T> = std::result::Result<T, Error>;
