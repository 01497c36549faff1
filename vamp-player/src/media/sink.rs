//! Media sink abstraction
//!
//! A sink is one rendering surface (the muted looping video, or the audible
//! audio) that can be given a source, started and stopped. Sinks report
//! asynchronous happenings (ready to play, natural end, load failure) through
//! the [`SinkNotifier`] they receive with each source; every notifier is bound
//! to the [`Generation`] of the sourcing that created it so that signals from
//! a superseded track can be recognized and dropped.

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

/// Which surface a sink drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkRole {
    /// Muted, looping video surface
    Video,
    /// Audible track; its end is the authoritative completion signal
    Audio,
}

impl std::fmt::Display for SinkRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SinkRole::Video => write!(f, "video"),
            SinkRole::Audio => write!(f, "audio"),
        }
    }
}

/// Literal sink state, as opposed to the controller's intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkStatus {
    Unloaded,
    LoadedPaused,
    LoadedPlaying,
}

/// Sink-level failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// The platform declined to start the sink
    #[error("{role} sink rejected play: {reason}")]
    PlayRejected { role: SinkRole, reason: String },

    /// Play did not resolve in time on at least one of the two sinks
    #[error("play did not resolve within {timeout:?} on the video and audio sinks")]
    PlayTimedOut { timeout: Duration },

    /// The sink cannot fetch or decode its source
    #[error("{role} sink failed to load '{media}': {reason}")]
    SourceLoadFailed {
        role: SinkRole,
        media: String,
        reason: String,
    },
}

impl SinkError {
    /// Sink that failed; unknown for a timeout over the pair
    pub fn role(&self) -> Option<SinkRole> {
        match self {
            SinkError::PlayRejected { role, .. } | SinkError::SourceLoadFailed { role, .. } => {
                Some(*role)
            }
            SinkError::PlayTimedOut { .. } => None,
        }
    }

    pub fn kind(&self) -> vamp_common::events::FailureKind {
        use vamp_common::events::FailureKind;
        match self {
            SinkError::PlayRejected { .. } | SinkError::PlayTimedOut { .. } => {
                FailureKind::PlaySinkRejected
            }
            SinkError::SourceLoadFailed { .. } => FailureKind::SourceLoadFailed,
        }
    }
}

/// Identifies one sourcing of the sink pair
///
/// Strictly increasing: a track change always produces a new generation,
/// even when it lands on the same playlist position as before.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Generation(self.0.wrapping_add(1))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Raw signal emitted by a sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkSignal {
    /// Source is loaded enough to start playing
    Ready { generation: Generation, role: SinkRole },
    /// Natural end of media
    Ended { generation: Generation, role: SinkRole },
    /// Source could not be fetched or decoded
    LoadFailed {
        generation: Generation,
        role: SinkRole,
        reason: String,
    },
}

impl SinkSignal {
    pub fn generation(&self) -> Generation {
        match self {
            SinkSignal::Ready { generation, .. }
            | SinkSignal::Ended { generation, .. }
            | SinkSignal::LoadFailed { generation, .. } => *generation,
        }
    }
}

/// Callback handle given to a sink together with each new source
#[derive(Debug, Clone)]
pub struct SinkNotifier {
    generation: Generation,
    role: SinkRole,
    tx: mpsc::UnboundedSender<SinkSignal>,
    ended: Arc<AtomicBool>,
}

impl SinkNotifier {
    pub(crate) fn new(
        generation: Generation,
        role: SinkRole,
        tx: mpsc::UnboundedSender<SinkSignal>,
    ) -> Self {
        Self {
            generation,
            role,
            tx,
            ended: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn role(&self) -> SinkRole {
        self.role
    }

    /// Report that the source can be played
    pub fn ready(&self) {
        self.send(SinkSignal::Ready {
            generation: self.generation,
            role: self.role,
        });
    }

    /// Report natural end of media; fires at most once per source
    pub fn ended(&self) {
        if self.ended.swap(true, Ordering::AcqRel) {
            return;
        }
        self.send(SinkSignal::Ended {
            generation: self.generation,
            role: self.role,
        });
    }

    /// Report that the source cannot be fetched or decoded
    pub fn load_failed(&self, reason: impl Into<String>) {
        self.send(SinkSignal::LoadFailed {
            generation: self.generation,
            role: self.role,
            reason: reason.into(),
        });
    }

    fn send(&self, signal: SinkSignal) {
        // Receiver gone means the player was torn down
        let _ = self.tx.send(signal);
    }
}

/// One controllable media surface
///
/// Implementations wrap a platform playback capability. Only the
/// [`MediaHandlePair`](super::MediaHandlePair) calls these methods.
pub trait MediaSink: Send + 'static {
    /// Surface this sink drives
    fn role(&self) -> SinkRole;

    /// Bind a new source; any previous readiness is void
    fn set_source(&mut self, media: &str, notifier: SinkNotifier);

    /// Start playing; resolves once the platform accepts or rejects
    fn play(&mut self) -> BoxFuture<'_, Result<(), SinkError>>;

    /// Stop playing; pausing a paused or unloaded sink is a no-op
    fn pause(&mut self);

    /// Literal sink state
    fn status(&self) -> SinkStatus;

    /// Release the source at teardown
    fn unload(&mut self) {
        self.pause();
    }
}
