//! Common error types for VAMP

use thiserror::Error;

/// Common result type for VAMP operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the VAMP crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML document could not be parsed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A playlist must hold at least one track
    #[error("Playlist is empty")]
    EmptyPlaylist,

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
