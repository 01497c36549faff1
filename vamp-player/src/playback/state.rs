//! Playback state
//!
//! The controller's only mutable entity: which track is current and whether
//! the user intends it to play. `is_playing` is intent, not hardware state:
//! right after a track change intent is paused while a resume may be pending.

use crate::media::Generation;
use serde::Serialize;
use vamp_common::events::{PlaybackState, TrackChangeReason};
use vamp_common::Playlist;

/// Current index and play/pause intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ControllerState {
    current_index: usize,
    is_playing: bool,
}

impl ControllerState {
    /// Initial state: seeded index, paused
    pub fn new(initial_index: usize) -> Self {
        Self {
            current_index: initial_index,
            is_playing: false,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn intent(&self) -> PlaybackState {
        PlaybackState::from_playing(self.is_playing)
    }

    /// Set intent; returns (old, new) when it actually changed
    pub(crate) fn set_playing(&mut self, playing: bool) -> Option<(PlaybackState, PlaybackState)> {
        if self.is_playing == playing {
            return None;
        }
        let old = self.intent();
        self.is_playing = playing;
        Some((old, self.intent()))
    }

    /// Move to `target` wrapped into the playlist; returns the new index
    pub(crate) fn move_to(&mut self, playlist: &Playlist, target: usize) -> usize {
        self.current_index = playlist.wrap(target);
        self.current_index
    }
}

/// Resume step waiting to re-assert playback after a track change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PendingResume {
    /// Sourcing this resume belongs to; any other sourcing makes it stale
    pub generation: Generation,
    pub reason: TrackChangeReason,
    pub delay_elapsed: bool,
    pub audio_ready: bool,
}

impl PendingResume {
    pub fn new(generation: Generation, reason: TrackChangeReason) -> Self {
        Self {
            generation,
            reason,
            delay_elapsed: false,
            audio_ready: false,
        }
    }

    /// Settle delay always applies; readiness only when configured
    pub fn is_due(&self, await_audio_ready: bool) -> bool {
        self.delay_elapsed && (self.audio_ready || !await_audio_ready)
    }
}
