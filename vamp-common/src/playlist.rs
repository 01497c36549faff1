//! Playlist and track descriptors
//!
//! The playlist is fixed input to the player: it is loaded once, never
//! mutated, and always holds at least one track. All index arithmetic the
//! player performs wraps modulo the playlist length, so a position taken
//! from this module is always valid.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Theme hint for a track (primary and accent color tags)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiColor {
    #[serde(default = "default_tag")]
    pub primary: String,
    #[serde(default = "default_tag")]
    pub accent: String,
}

fn default_tag() -> String {
    "blue".to_string()
}

/// One playlist entry: the media references plus opaque display metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Display title
    pub title: String,
    /// Location label ("At ...")
    #[serde(default)]
    pub location: String,
    /// Attribution ("Room by: ...")
    #[serde(default)]
    pub room_by: String,
    /// External link shown under the title
    #[serde(default)]
    pub link: String,
    /// Video source reference (muted, looping surface)
    pub video: String,
    /// Audio source reference (the audible track)
    pub audio: String,
    /// Optional theme hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_color: Option<UiColor>,
}

/// Ordered, non-empty sequence of tracks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Playlist {
    tracks: Vec<Track>,
}

/// On-disk playlist layout: a list of `[[track]]` tables
#[derive(Debug, Deserialize)]
struct PlaylistFile {
    #[serde(default, rename = "track")]
    tracks: Vec<Track>,
}

#[allow(clippy::len_without_is_empty)]
impl Playlist {
    /// Build a playlist, rejecting an empty track list
    pub fn new(tracks: Vec<Track>) -> Result<Self> {
        if tracks.is_empty() {
            return Err(Error::EmptyPlaylist);
        }
        Ok(Self { tracks })
    }

    /// Parse a playlist from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: PlaylistFile = toml::from_str(content)?;
        Self::new(file.tracks)
    }

    /// Load a playlist from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let playlist = Self::from_toml_str(&content).map_err(|e| match e {
            Error::EmptyPlaylist => {
                Error::Config(format!("Playlist {} contains no tracks", path.display()))
            }
            other => other,
        })?;
        debug!("Loaded {} tracks from {}", playlist.len(), path.display());
        Ok(playlist)
    }

    /// Number of tracks (always at least 1)
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Track at `index`, wrapped into range
    pub fn track(&self, index: usize) -> &Track {
        &self.tracks[self.wrap(index)]
    }

    /// Reduce any index into `[0, len)`
    pub fn wrap(&self, index: usize) -> usize {
        index % self.tracks.len()
    }

    /// Position after `index`, wrapping past the last track to 0
    pub fn next_index(&self, index: usize) -> usize {
        (self.wrap(index) + 1) % self.tracks.len()
    }

    /// Position before `index`, wrapping from 0 to the last track
    pub fn previous_index(&self, index: usize) -> usize {
        let len = self.tracks.len();
        (self.wrap(index) + len - 1) % len
    }
}
