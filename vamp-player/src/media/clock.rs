//! Headless clock-driven sink
//!
//! Stands in for a platform media element when no real surface is attached
//! (service mode, tests). It keeps time on the tokio clock: the audio-role
//! sink reports end of media after the configured track length of actual
//! playing time, the video-role sink loops forever.
//!
//! Source conventions:
//! - `missing:<anything>` fails to load (reported via notifier and `play()`)
//! - `reject:<anything>` loads fine but every `play()` is rejected

use super::sink::{MediaSink, SinkError, SinkNotifier, SinkRole, SinkStatus};
use futures::future::BoxFuture;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::trace;

const MISSING_PREFIX: &str = "missing:";
const REJECT_PREFIX: &str = "reject:";

/// Timing for a clock sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockSettings {
    /// Playing time until the audio sink reports end of media
    pub track_length: Duration,
    /// Delay between sourcing and the readiness (or load failure) signal
    pub load_latency: Duration,
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            track_length: Duration::from_secs(180),
            load_latency: Duration::from_millis(50),
        }
    }
}

/// Sink that plays nothing but keeps time
pub struct ClockSink {
    role: SinkRole,
    settings: ClockSettings,
    media: Option<String>,
    load_error: Option<String>,
    status: SinkStatus,
    notifier: Option<SinkNotifier>,
    /// Playing time accumulated before the current run
    played: Duration,
    started_at: Option<Instant>,
    load_task: Option<JoinHandle<()>>,
    end_task: Option<JoinHandle<()>>,
}

impl ClockSink {
    pub fn new(role: SinkRole, settings: ClockSettings) -> Self {
        Self {
            role,
            settings,
            media: None,
            load_error: None,
            status: SinkStatus::Unloaded,
            notifier: None,
            played: Duration::ZERO,
            started_at: None,
            load_task: None,
            end_task: None,
        }
    }

    pub fn boxed(role: SinkRole, settings: ClockSettings) -> Box<dyn MediaSink> {
        Box::new(Self::new(role, settings))
    }

    /// Position within the current source
    ///
    /// The video sink loops, so its position wraps at the track length.
    pub fn position(&self) -> Duration {
        let running = self.started_at.map(|t| t.elapsed()).unwrap_or_default();
        let total = self.played + running;
        match self.role {
            SinkRole::Audio => total.min(self.settings.track_length),
            SinkRole::Video if self.settings.track_length.is_zero() => Duration::ZERO,
            SinkRole::Video => Duration::from_nanos(
                (total.as_nanos() % self.settings.track_length.as_nanos()) as u64,
            ),
        }
    }

    fn cancel_tasks(&mut self) {
        if let Some(task) = self.load_task.take() {
            task.abort();
        }
        self.cancel_end();
    }

    fn cancel_end(&mut self) {
        if let Some(task) = self.end_task.take() {
            task.abort();
        }
    }

    fn schedule_end(&mut self) {
        // Video loops: no natural end
        if self.role != SinkRole::Audio {
            return;
        }
        let Some(notifier) = self.notifier.clone() else {
            return;
        };
        let remaining = self.settings.track_length.saturating_sub(self.played);
        self.end_task = Some(tokio::spawn(async move {
            tokio::time::sleep(remaining).await;
            notifier.ended();
        }));
    }

    fn start(&mut self) -> Result<(), SinkError> {
        let media = match &self.media {
            Some(media) => media.clone(),
            None => {
                return Err(SinkError::SourceLoadFailed {
                    role: self.role,
                    media: String::new(),
                    reason: "no source assigned".to_string(),
                })
            }
        };

        if let Some(reason) = &self.load_error {
            return Err(SinkError::SourceLoadFailed {
                role: self.role,
                media,
                reason: reason.clone(),
            });
        }

        if media.starts_with(REJECT_PREFIX) {
            return Err(SinkError::PlayRejected {
                role: self.role,
                reason: "autoplay not allowed".to_string(),
            });
        }

        if self.status != SinkStatus::LoadedPlaying {
            self.status = SinkStatus::LoadedPlaying;
            self.started_at = Some(Instant::now());
            self.schedule_end();
        }
        Ok(())
    }
}

impl MediaSink for ClockSink {
    fn role(&self) -> SinkRole {
        self.role
    }

    fn set_source(&mut self, media: &str, notifier: SinkNotifier) {
        self.cancel_tasks();
        self.media = Some(media.to_string());
        self.status = SinkStatus::LoadedPaused;
        self.played = Duration::ZERO;
        self.started_at = None;
        self.load_error = media
            .strip_prefix(MISSING_PREFIX)
            .map(|rest| format!("source not found: {rest}"));

        let latency = self.settings.load_latency;
        let load_error = self.load_error.clone();
        let load_notifier = notifier.clone();
        self.load_task = Some(tokio::spawn(async move {
            tokio::time::sleep(latency).await;
            match load_error {
                Some(reason) => load_notifier.load_failed(reason),
                None => load_notifier.ready(),
            }
        }));
        self.notifier = Some(notifier);
        trace!("{} clock sink sourced with {}", self.role, media);
    }

    fn play(&mut self) -> BoxFuture<'_, Result<(), SinkError>> {
        let result = self.start();
        Box::pin(futures::future::ready(result))
    }

    fn pause(&mut self) {
        if let Some(started_at) = self.started_at.take() {
            self.played += started_at.elapsed();
        }
        self.cancel_end();
        if self.status == SinkStatus::LoadedPlaying {
            self.status = SinkStatus::LoadedPaused;
        }
    }

    fn status(&self) -> SinkStatus {
        self.status
    }

    fn unload(&mut self) {
        self.pause();
        self.cancel_tasks();
        self.media = None;
        self.notifier = None;
        self.status = SinkStatus::Unloaded;
    }
}

impl Drop for ClockSink {
    fn drop(&mut self) {
        self.cancel_tasks();
    }
}
