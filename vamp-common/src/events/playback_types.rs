//! Playback-related type definitions
//!
//! Supporting types for playback intent, track changes and failure reporting.

use serde::{Deserialize, Serialize};

/// Playback intent
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Playing,
    Paused,
}

impl PlaybackState {
    pub fn from_playing(is_playing: bool) -> Self {
        if is_playing {
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing)
    }
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackState::Playing => write!(f, "playing"),
            PlaybackState::Paused => write!(f, "paused"),
        }
    }
}

/// Why the current track changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum TrackChangeReason {
    /// User pressed next
    Next,
    /// User pressed previous
    Previous,
    /// Audio sink reached natural end of media
    AutoAdvance,
    /// Direct selection of a playlist position
    Jump,
}

impl std::fmt::Display for TrackChangeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackChangeReason::Next => write!(f, "Next"),
            TrackChangeReason::Previous => write!(f, "Previous"),
            TrackChangeReason::AutoAdvance => write!(f, "AutoAdvance"),
            TrackChangeReason::Jump => write!(f, "Jump"),
        }
    }
}

/// User-visible playback failure classes
///
/// Stale resumes are not in this list: they are suppressed, never reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum FailureKind {
    /// A sink declined to start (autoplay policy, missing gesture, timeout)
    PlaySinkRejected,
    /// A sink could not fetch or decode its source
    SourceLoadFailed,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::PlaySinkRejected => write!(f, "PlaySinkRejected"),
            FailureKind::SourceLoadFailed => write!(f, "SourceLoadFailed"),
        }
    }
}
