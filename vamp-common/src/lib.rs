//! # VAMP Common Library
//!
//! Shared code for the VAMP player crates including:
//! - Playlist and track descriptors (read-only input to the player)
//! - Theme lookup for a track's display hint
//! - Event types (PlayerEvent enum) and the EventBus
//! - Configuration file resolution
//! - Timestamp utilities

pub mod config;
pub mod error;
pub mod events;
pub mod playlist;
pub mod theme;
pub mod time;

pub use error::{Error, Result};
pub use playlist::{Playlist, Track, UiColor};
pub use theme::{StyleSet, ThemeColor, TrackTheme};
