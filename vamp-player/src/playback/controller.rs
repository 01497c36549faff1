//! Playback controller
//!
//! Owns the controller state, the sink pair and the location sync, and
//! serializes every transition through one tokio task. User commands, sink
//! signals and resume timers all arrive as messages; each one runs to
//! completion before the next is looked at, so no two transitions ever
//! interleave.
//!
//! **Track change:** pause both sinks, move the index, bump the sourcing
//! generation, rebind both sinks, mirror the location, then (when playback
//! was wanted) schedule a resume step for that generation.
//!
//! **Resume step:** fires after the settle delay (and, optionally, the audio
//! sink's readiness). A resume whose generation is no longer current is
//! stale and is dropped without touching the sinks.

use super::handle::{Command, PlayerHandle, Target};
use super::state::{ControllerState, PendingResume};
use super::view::PlayerView;
use crate::config::ControllerConfig;
use crate::error::{Error, Result};
use crate::location::LocationSync;
use crate::media::{Generation, MediaHandlePair, PairEvent, SignalReceiver, SinkError};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};
use vamp_common::events::{EventBus, PlayerEvent, TrackChangeReason};
use vamp_common::time;
use vamp_common::Playlist;

/// Command queue depth
const COMMAND_CAPACITY: usize = 32;

/// Single-owner playback state machine
pub struct PlaybackController {
    playlist: Arc<Playlist>,
    pair: MediaHandlePair,
    location: Box<dyn LocationSync>,
    config: ControllerConfig,
    events: Arc<EventBus>,
    state: ControllerState,
    generation: Generation,
    pending: Option<PendingResume>,
    video_loaded: bool,
    view_tx: watch::Sender<PlayerView>,
    resume_tx: mpsc::UnboundedSender<Generation>,
}

impl PlaybackController {
    /// Mount the player and start its task
    ///
    /// The initial index is seeded from the location (out-of-range or absent
    /// means the first track), both sinks are sourced with that track and the
    /// location is rewritten to match. Playback starts paused.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        playlist: Arc<Playlist>,
        mut pair: MediaHandlePair,
        location: Box<dyn LocationSync>,
        config: ControllerConfig,
        events: Arc<EventBus>,
    ) -> Result<PlayerHandle> {
        let signals = pair.take_signals().ok_or_else(|| {
            Error::InvalidState("sink pair is already attached to a controller".to_string())
        })?;

        let initial_index = location.initial_index(playlist.len());
        let state = ControllerState::new(initial_index);
        let (view_tx, view_rx) = watch::channel(PlayerView::build(&playlist, &state, false));
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CAPACITY);
        let (resume_tx, resume_rx) = mpsc::unbounded_channel();

        let mut controller = Self {
            playlist,
            pair,
            location,
            config,
            events: Arc::clone(&events),
            state,
            generation: Generation::default(),
            pending: None,
            video_loaded: false,
            view_tx,
            resume_tx,
        };
        controller.mount();

        tokio::spawn(controller.run(command_rx, signals, resume_rx));

        Ok(PlayerHandle::new(command_tx, view_rx, events))
    }

    fn mount(&mut self) {
        let index = self.state.current_index();
        self.generation = self.generation.next();
        let track = self.playlist.track(index);
        self.pair.set_source(self.generation, &track.video, &track.audio);
        self.location.sync_index(index);
        self.events.emit_lossy(PlayerEvent::LocationChanged {
            track_number: index + 1,
            timestamp: time::now(),
        });

        info!(
            "Player mounted at track {}/{}: '{}'",
            index + 1,
            self.playlist.len(),
            track.title
        );
        self.publish();
    }

    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut signals: SignalReceiver,
        mut resumes: mpsc::UnboundedReceiver<Generation>,
    ) {
        debug!("Playback controller task started");

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Shutdown { reply }) => {
                        self.teardown();
                        let _ = reply.send(());
                        return;
                    }
                    Some(Command::Toggle { reply }) => {
                        let result = self.toggle_playback().await.map(|()| self.view());
                        let _ = reply.send(result);
                    }
                    Some(Command::Advance { target, reply }) => {
                        self.handle_advance(target);
                        let _ = reply.send(self.view());
                    }
                    // Every handle dropped
                    None => break,
                },
                Some(signal) = signals.recv() => {
                    if let Some(event) = self.pair.accept(signal) {
                        self.handle_pair_event(event).await;
                    }
                }
                Some(generation) = resumes.recv() => self.handle_resume_due(generation).await,
            }
        }

        self.teardown();
    }

    fn handle_advance(&mut self, target: Target) {
        let current = self.state.current_index();
        let (index, reason) = match target {
            Target::Next => (self.playlist.next_index(current), TrackChangeReason::Next),
            Target::Previous => (
                self.playlist.previous_index(current),
                TrackChangeReason::Previous,
            ),
            Target::Index(index) => (index, TrackChangeReason::Jump),
        };
        self.advance_to(index, reason, false);
    }

    /// Flip play/pause intent
    ///
    /// An explicit toggle always supersedes a pending resume.
    async fn toggle_playback(&mut self) -> Result<()> {
        if self.pending.take().is_some() {
            debug!("Toggle supersedes pending resume");
        }

        if self.state.is_playing() {
            self.pair.pause();
            self.set_intent(false);
            self.publish();
            Ok(())
        } else {
            self.start_playback().await
        }
    }

    /// Move to `target` (wrapped), carrying playback intent across
    ///
    /// `force_resume` makes the new track play even if the old one was
    /// paused; only automatic advancement uses it.
    fn advance_to(&mut self, target: usize, reason: TrackChangeReason, force_resume: bool) {
        // A pending resume still carries the intent of the track it belonged to
        let superseded = self.pending.take();
        let was_playing = self.state.is_playing() || superseded.is_some();
        if let Some(pending) = superseded {
            debug!(
                "Track change supersedes pending resume for sourcing {}",
                pending.generation
            );
        }

        // Outgoing track stops before anything else changes
        self.pair.pause();
        self.set_intent(false);

        let old_index = self.state.current_index();
        let new_index = self.state.move_to(&self.playlist, target);
        self.generation = self.generation.next();
        self.video_loaded = false;

        let track = self.playlist.track(new_index);
        self.pair.set_source(self.generation, &track.video, &track.audio);
        self.location.sync_index(new_index);

        info!(
            "Track changed ({}): {} -> {} '{}'",
            reason,
            old_index + 1,
            new_index + 1,
            track.title
        );
        self.events.emit_lossy(PlayerEvent::TrackChanged {
            old_index,
            new_index,
            reason,
            timestamp: time::now(),
        });
        self.events.emit_lossy(PlayerEvent::LocationChanged {
            track_number: new_index + 1,
            timestamp: time::now(),
        });

        if was_playing || force_resume {
            self.schedule_resume(reason);
        }
        self.publish();
    }

    fn schedule_resume(&mut self, reason: TrackChangeReason) {
        let generation = self.generation;
        self.pending = Some(PendingResume::new(generation, reason));

        let delay = self.config.resume_delay;
        let resume_tx = self.resume_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Controller gone: nothing left to resume
            let _ = resume_tx.send(generation);
        });
        debug!("Resume scheduled for sourcing {} in {:?}", generation, delay);
    }

    async fn handle_resume_due(&mut self, generation: Generation) {
        match self.pending.as_mut() {
            Some(pending) if pending.generation == generation => {
                pending.delay_elapsed = true;
                self.try_resume().await;
            }
            _ => debug!(
                "Suppressing stale resume for sourcing {} (current {})",
                generation, self.generation
            ),
        }
    }

    async fn try_resume(&mut self) {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.is_due(self.config.await_audio_ready));
        if !due {
            return;
        }
        let Some(pending) = self.pending.take() else {
            return;
        };

        info!(
            "Resuming playback on track {} after {}",
            self.state.current_index() + 1,
            pending.reason
        );
        // Failures are already reported through the event bus
        let _ = self.start_playback().await;
    }

    /// Play both sinks; on any failure both end up paused again
    async fn start_playback(&mut self) -> Result<()> {
        let timeout = self.config.play_timeout;
        let outcome = match tokio::time::timeout(timeout, self.pair.play()).await {
            Ok(result) => result,
            Err(_) => Err(SinkError::PlayTimedOut { timeout }),
        };

        match outcome {
            Ok(()) => {
                self.set_intent(true);
                self.publish();
                Ok(())
            }
            Err(err) => {
                // One sink may already be running
                self.pair.pause();
                self.set_intent(false);
                self.report_failure(&err);
                self.publish();
                Err(Error::Playback(err))
            }
        }
    }

    async fn handle_pair_event(&mut self, event: PairEvent) {
        match event {
            PairEvent::TrackEnded => {
                let next = self.playlist.next_index(self.state.current_index());
                debug!(
                    "Audio ended on track {}, advancing to {}",
                    self.state.current_index() + 1,
                    next + 1
                );
                self.advance_to(next, TrackChangeReason::AutoAdvance, true);
            }
            PairEvent::AudioReady => {
                if let Some(pending) = self.pending.as_mut() {
                    pending.audio_ready = true;
                    self.try_resume().await;
                }
            }
            PairEvent::VideoReady => {
                if !self.video_loaded {
                    self.video_loaded = true;
                    self.events.emit_lossy(PlayerEvent::VideoReady {
                        index: self.state.current_index(),
                        timestamp: time::now(),
                    });
                    self.publish();
                }
            }
            PairEvent::LoadFailed(err) => {
                self.report_failure(&err);
                if self.pending.take().is_some() {
                    debug!("Dropping pending resume: current track failed to load");
                }
                if self.state.is_playing() {
                    self.pair.pause();
                    self.set_intent(false);
                }
                self.publish();
            }
        }
    }

    fn set_intent(&mut self, playing: bool) {
        if let Some((old_state, new_state)) = self.state.set_playing(playing) {
            info!("Playback {} -> {}", old_state, new_state);
            self.events.emit_lossy(PlayerEvent::PlaybackStateChanged {
                old_state,
                new_state,
                index: self.state.current_index(),
                timestamp: time::now(),
            });
        }
    }

    fn report_failure(&self, err: &SinkError) {
        warn!(
            "Playback failure on track {}: {}",
            self.state.current_index() + 1,
            err
        );
        self.events.emit_lossy(PlayerEvent::PlaybackFailed {
            index: self.state.current_index(),
            kind: err.kind(),
            message: err.to_string(),
            timestamp: time::now(),
        });
    }

    fn teardown(&mut self) {
        self.pending = None;
        self.pair.pause();
        self.pair.unload();
        self.set_intent(false);
        self.publish();
        info!("Playback controller stopped");
    }

    fn view(&self) -> PlayerView {
        PlayerView::build(&self.playlist, &self.state, self.video_loaded)
    }

    fn publish(&self) {
        self.view_tx.send_replace(self.view());
    }
}
