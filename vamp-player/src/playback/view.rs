//! Derived, read-only display state
//!
//! Everything the view layer needs to render the player. Rebuilt and
//! published after every transition.

use super::state::ControllerState;
use serde::Serialize;
use vamp_common::{Playlist, Track, TrackTheme};

/// Display snapshot of the player
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    /// 0-based playlist position
    pub current_index: usize,
    /// 1-based position for the "n / total" indicator
    pub track_number: usize,
    pub total_count: usize,
    /// Playback intent
    pub is_playing: bool,
    /// First frame of the current video is shown (loading indicator off)
    pub video_loaded: bool,
    pub current_track: Track,
    pub theme: TrackTheme,
}

impl PlayerView {
    pub fn build(playlist: &Playlist, state: &ControllerState, video_loaded: bool) -> Self {
        let track = playlist.track(state.current_index());
        Self {
            current_index: state.current_index(),
            track_number: state.current_index() + 1,
            total_count: playlist.len(),
            is_playing: state.is_playing(),
            video_loaded,
            current_track: track.clone(),
            theme: TrackTheme::for_hint(track.ui_color.as_ref()),
        }
    }
}
