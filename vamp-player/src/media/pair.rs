//! Video + audio sink pair
//!
//! Wraps exactly two sinks so the controller can command them as one unit.
//! `play` and `pause` always fan out to both sinks. The pair does NOT keep
//! the two in step on its own: synchrony is maintained by the controller,
//! which re-pauses both whenever a play attempt fails halfway.

use super::sink::{
    Generation, MediaSink, SinkError, SinkNotifier, SinkRole, SinkSignal, SinkStatus,
};
use crate::error::{Error, Result};
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Receiving end of the sink signal channel
pub type SignalReceiver = mpsc::UnboundedReceiver<SinkSignal>;

/// Signal from the pair after filtering for the current track
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairEvent {
    /// Audio sink reached natural end of the current track
    TrackEnded,
    /// Audio sink can start playing the current track
    AudioReady,
    /// Video sink shows the current track (display only)
    VideoReady,
    /// A sink cannot load the current track
    LoadFailed(SinkError),
}

/// The two sinks of one player
pub struct MediaHandlePair {
    video: Box<dyn MediaSink>,
    audio: Box<dyn MediaSink>,
    generation: Generation,
    sources: Option<(String, String)>,
    signal_tx: mpsc::UnboundedSender<SinkSignal>,
    signal_rx: Option<SignalReceiver>,
}

impl MediaHandlePair {
    /// Pair a video-role sink with an audio-role sink
    pub fn new(video: Box<dyn MediaSink>, audio: Box<dyn MediaSink>) -> Result<Self> {
        if video.role() != SinkRole::Video || audio.role() != SinkRole::Audio {
            return Err(Error::InvalidState(format!(
                "sink pair needs (video, audio), got ({}, {})",
                video.role(),
                audio.role()
            )));
        }

        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        Ok(Self {
            video,
            audio,
            generation: Generation::default(),
            sources: None,
            signal_tx,
            signal_rx: Some(signal_rx),
        })
    }

    /// Hand the signal receiver to the controller (once)
    pub(crate) fn take_signals(&mut self) -> Option<SignalReceiver> {
        self.signal_rx.take()
    }

    /// Rebind both sinks to a new track's media
    pub fn set_source(&mut self, generation: Generation, video: &str, audio: &str) {
        debug!("Sourcing sink pair {}: video={}, audio={}", generation, video, audio);
        self.generation = generation;
        self.sources = Some((video.to_string(), audio.to_string()));
        self.video.set_source(
            video,
            SinkNotifier::new(generation, SinkRole::Video, self.signal_tx.clone()),
        );
        self.audio.set_source(
            audio,
            SinkNotifier::new(generation, SinkRole::Audio, self.signal_tx.clone()),
        );
    }

    /// Issue play to both sinks
    ///
    /// Returns the first failure, audio before video. Does not retry and does
    /// not undo a sink that did start; the caller decides.
    pub async fn play(&mut self) -> std::result::Result<(), SinkError> {
        let Self { video, audio, .. } = self;
        let (video_result, audio_result) = futures::join!(video.play(), audio.play());
        audio_result.and(video_result)
    }

    /// Issue pause to both sinks
    pub fn pause(&mut self) {
        self.video.pause();
        self.audio.pause();
    }

    /// Release both sources at teardown
    pub fn unload(&mut self) {
        self.video.unload();
        self.audio.unload();
        self.sources = None;
    }

    /// Literal (video, audio) sink states
    pub fn status(&self) -> (SinkStatus, SinkStatus) {
        (self.video.status(), self.audio.status())
    }

    /// True when both sinks are in the same play state
    pub fn is_synchronized(&self) -> bool {
        let (video, audio) = self.status();
        (video == SinkStatus::LoadedPlaying) == (audio == SinkStatus::LoadedPlaying)
    }

    /// Filter a raw sink signal down to what matters for the current track
    ///
    /// Signals from a superseded generation are dropped, and so is the video
    /// sink's end of media: the video loops and audio end is authoritative.
    pub fn accept(&self, signal: SinkSignal) -> Option<PairEvent> {
        if signal.generation() != self.generation {
            trace!(
                "Dropping signal from superseded sourcing {} (current {})",
                signal.generation(),
                self.generation
            );
            return None;
        }

        match signal {
            SinkSignal::Ended { role: SinkRole::Audio, .. } => Some(PairEvent::TrackEnded),
            SinkSignal::Ended { role: SinkRole::Video, .. } => {
                trace!("Ignoring video end of media (video loops)");
                None
            }
            SinkSignal::Ready { role: SinkRole::Audio, .. } => Some(PairEvent::AudioReady),
            SinkSignal::Ready { role: SinkRole::Video, .. } => Some(PairEvent::VideoReady),
            SinkSignal::LoadFailed { role, reason, .. } => {
                let media = self
                    .sources
                    .as_ref()
                    .map(|(video, audio)| match role {
                        SinkRole::Video => video.clone(),
                        SinkRole::Audio => audio.clone(),
                    })
                    .unwrap_or_default();
                Some(PairEvent::LoadFailed(SinkError::SourceLoadFailed {
                    role,
                    media,
                    reason,
                }))
            }
        }
    }
}
