//! Event types for the VAMP event system
//!
//! Provides the shared event definitions and the EventBus used by the player
//! and its view surfaces.

mod playback_types;

pub use playback_types::{FailureKind, PlaybackState, TrackChangeReason};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Player event types
///
/// Events are broadcast via EventBus and can be serialized for SSE transmission.
/// Consumers match on this enum exhaustively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerEvent {
    /// Playback intent changed (Playing ↔ Paused)
    ///
    /// Triggers:
    /// - SSE: Update play/pause button
    PlaybackStateChanged {
        /// Intent before change
        old_state: PlaybackState,
        /// Intent after change
        new_state: PlaybackState,
        /// Track position the change applies to
        index: usize,
        /// When state changed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Current track changed
    ///
    /// Triggers:
    /// - SSE: Update title, metadata, theme and track counter
    /// - UI: Show loading indicator until VideoReady
    TrackChanged {
        /// Previous playlist position
        old_index: usize,
        /// New playlist position
        new_index: usize,
        /// What caused the change
        reason: TrackChangeReason,
        /// When track changed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Video surface decoded its first frame for the current track
    ///
    /// Display only: has no bearing on playback correctness.
    VideoReady {
        /// Playlist position of the ready track
        index: usize,
        /// When the surface became ready
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A sink failed to start or to load its source
    ///
    /// Non-fatal: intent stays (or reverts to) paused and the player
    /// remains usable. The view layer decides how to surface it.
    PlaybackFailed {
        /// Playlist position that failed
        index: usize,
        /// Failure class
        kind: FailureKind,
        /// Human-readable reason
        message: String,
        /// When the failure was observed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Addressable location was rewritten
    LocationChanged {
        /// 1-based track number now held by the location
        track_number: usize,
        /// When the location changed
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl PlayerEvent {
    /// Variant name, used as the SSE event field
    pub fn event_type(&self) -> &'static str {
        match self {
            PlayerEvent::PlaybackStateChanged { .. } => "PlaybackStateChanged",
            PlayerEvent::TrackChanged { .. } => "TrackChanged",
            PlayerEvent::VideoReady { .. } => "VideoReady",
            PlayerEvent::PlaybackFailed { .. } => "PlaybackFailed",
            PlayerEvent::LocationChanged { .. } => "LocationChanged",
        }
    }
}

/// Central event distribution bus
///
/// Thin wrapper around `tokio::sync::broadcast`. Slow subscribers lag and
/// lose the oldest events rather than blocking the emitter.
#[derive(Debug)]
pub struct EventBus {
    tx: broadcast::Sender<PlayerEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// # Examples
    ///
    /// ```
    /// use vamp_common::events::EventBus;
    ///
    /// let event_bus = EventBus::new(100);
    /// assert_eq!(event_bus.capacity(), 100);
    /// ```
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: PlayerEvent,
    ) -> Result<usize, broadcast::error::SendError<PlayerEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: PlayerEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn state_changed() -> PlayerEvent {
        PlayerEvent::PlaybackStateChanged {
            old_state: PlaybackState::Paused,
            new_state: PlaybackState::Playing,
            index: 0,
            timestamp: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_eventbus_subscribe() {
        let bus = EventBus::new(10);
        assert_eq!(bus.subscriber_count(), 0);
        let _rx = bus.subscribe();
        let _rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[test]
    fn test_eventbus_emit_no_subscribers() {
        let bus = EventBus::new(10);
        assert!(bus.emit(state_changed()).is_err());
        // Lossy emit never fails
        bus.emit_lossy(state_changed());
    }

    #[tokio::test]
    async fn test_eventbus_emit_with_subscriber() {
        let bus = Arc::new(EventBus::new(10));
        let mut rx = bus.subscribe();

        assert_eq!(bus.emit(state_changed()).unwrap(), 1);

        match rx.recv().await.unwrap() {
            PlayerEvent::PlaybackStateChanged {
                old_state,
                new_state,
                ..
            } => {
                assert_eq!(old_state, PlaybackState::Paused);
                assert_eq!(new_state, PlaybackState::Playing);
            }
            other => panic!("Wrong event type received: {:?}", other),
        }
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = PlayerEvent::PlaybackFailed {
            index: 2,
            kind: FailureKind::PlaySinkRejected,
            message: "autoplay blocked".to_string(),
            timestamp: chrono::Utc::now(),
        };

        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "PlaybackFailed");
        assert_eq!(json["kind"], "PlaySinkRejected");
        assert_eq!(json["index"], 2);
        assert_eq!(event.event_type(), "PlaybackFailed");
    }

    #[test]
    fn test_playback_state_helpers() {
        assert_eq!(PlaybackState::from_playing(true), PlaybackState::Playing);
        assert!(!PlaybackState::from_playing(false).is_playing());
        assert_eq!(PlaybackState::Paused.to_string(), "paused");
    }
}
