//! # VAMP Player Library (vamp-player)
//!
//! Playlist-driven video + audio player core.
//!
//! **Purpose:** Drive a muted looping video sink and an audible audio sink as
//! one unit, advance through a playlist on audio completion, carry
//! play/pause intent across track changes, and mirror the current track into
//! an addressable location.
//!
//! **Architecture:** A single-owner [`PlaybackController`](playback::PlaybackController)
//! task serializes every transition; sinks report back through generation
//! tagged notifiers; display state is published through a watch channel and
//! an event bus.

pub mod api;
pub mod config;
pub mod error;
pub mod location;
pub mod media;
pub mod playback;

pub use error::{Error, Result};
pub use playback::{PlaybackController, PlayerHandle, PlayerView};
