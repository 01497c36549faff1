//! Test helpers for vamp-player integration tests
//!
//! - RecordingSink: mock sink logging every call into a log shared by both
//!   sinks of a pair, so cross-sink ordering can be asserted
//! - SinkProbe: test-side remote for a RecordingSink (fire signals, inject
//!   play failures, inspect status)
//! - TestPlayer: a spawned controller wired to two recording sinks

#![allow(dead_code)]

use futures::future::BoxFuture;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, watch};
use url::Url;
use vamp_common::events::{EventBus, PlayerEvent};
use vamp_common::{Playlist, Track, UiColor};
use vamp_player::config::ControllerConfig;
use vamp_player::location::QueryLocation;
use vamp_player::media::{
    MediaHandlePair, MediaSink, SinkError, SinkNotifier, SinkRole, SinkStatus,
};
use vamp_player::{PlaybackController, PlayerHandle};

/// Calls made on either sink, in order
pub type CallLog = Arc<Mutex<Vec<String>>>;

/// Test-side view of one recording sink
#[derive(Clone)]
pub struct SinkProbe {
    notifier: Arc<Mutex<Option<SinkNotifier>>>,
    status: Arc<Mutex<SinkStatus>>,
    source: Arc<Mutex<Option<String>>>,
    reject_play: Arc<AtomicBool>,
    hang_play: Arc<AtomicBool>,
}

impl SinkProbe {
    fn new() -> Self {
        Self {
            notifier: Arc::new(Mutex::new(None)),
            status: Arc::new(Mutex::new(SinkStatus::Unloaded)),
            source: Arc::new(Mutex::new(None)),
            reject_play: Arc::new(AtomicBool::new(false)),
            hang_play: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Notifier handed over with the current source
    pub fn notifier(&self) -> SinkNotifier {
        self.notifier
            .lock()
            .unwrap()
            .clone()
            .expect("sink has not been sourced")
    }

    pub fn ready(&self) {
        self.notifier().ready();
    }

    pub fn ended(&self) {
        self.notifier().ended();
    }

    pub fn load_failed(&self, reason: &str) {
        self.notifier().load_failed(reason);
    }

    /// Make every following play() fail (or succeed again)
    pub fn reject_play(&self, reject: bool) {
        self.reject_play.store(reject, Ordering::SeqCst);
    }

    /// Make every following play() never resolve
    pub fn hang_play(&self, hang: bool) {
        self.hang_play.store(hang, Ordering::SeqCst);
    }

    pub fn status(&self) -> SinkStatus {
        *self.status.lock().unwrap()
    }

    pub fn source(&self) -> Option<String> {
        self.source.lock().unwrap().clone()
    }

    pub fn is_playing(&self) -> bool {
        self.status() == SinkStatus::LoadedPlaying
    }
}

/// Mock sink recording calls into a shared log
pub struct RecordingSink {
    role: SinkRole,
    log: CallLog,
    probe: SinkProbe,
}

impl RecordingSink {
    pub fn new(role: SinkRole, log: &CallLog) -> (Self, SinkProbe) {
        let probe = SinkProbe::new();
        (
            Self {
                role,
                log: Arc::clone(log),
                probe: probe.clone(),
            },
            probe,
        )
    }

    fn record(&self, call: String) {
        self.log.lock().unwrap().push(call);
    }
}

impl MediaSink for RecordingSink {
    fn role(&self) -> SinkRole {
        self.role
    }

    fn set_source(&mut self, media: &str, notifier: SinkNotifier) {
        self.record(format!("{} source {}", self.role, media));
        *self.probe.source.lock().unwrap() = Some(media.to_string());
        *self.probe.notifier.lock().unwrap() = Some(notifier);
        *self.probe.status.lock().unwrap() = SinkStatus::LoadedPaused;
    }

    fn play(&mut self) -> BoxFuture<'_, Result<(), SinkError>> {
        self.record(format!("{} play", self.role));
        if self.probe.hang_play.load(Ordering::SeqCst) {
            return Box::pin(futures::future::pending());
        }
        let result = if self.probe.reject_play.load(Ordering::SeqCst) {
            Err(SinkError::PlayRejected {
                role: self.role,
                reason: "autoplay not allowed".to_string(),
            })
        } else {
            *self.probe.status.lock().unwrap() = SinkStatus::LoadedPlaying;
            Ok(())
        };
        Box::pin(futures::future::ready(result))
    }

    fn pause(&mut self) {
        self.record(format!("{} pause", self.role));
        let mut status = self.probe.status.lock().unwrap();
        if *status == SinkStatus::LoadedPlaying {
            *status = SinkStatus::LoadedPaused;
        }
    }

    fn status(&self) -> SinkStatus {
        self.probe.status()
    }

    fn unload(&mut self) {
        self.record(format!("{} unload", self.role));
        *self.probe.status.lock().unwrap() = SinkStatus::Unloaded;
        *self.probe.source.lock().unwrap() = None;
    }
}

/// Track `i` with media `v{i}.mp4` / `a{i}.mp3`; odd tracks carry a theme hint
pub fn track(i: usize) -> Track {
    Track {
        title: format!("Track {}", i + 1),
        location: format!("Venue {}", i + 1),
        room_by: "Test Room".to_string(),
        link: format!("https://example.test/{}", i + 1),
        video: format!("v{i}.mp4"),
        audio: format!("a{i}.mp3"),
        ui_color: (i % 2 == 1).then(|| UiColor {
            primary: "purple".to_string(),
            accent: "pink".to_string(),
        }),
    }
}

pub fn playlist(len: usize) -> Arc<Playlist> {
    Arc::new(Playlist::new((0..len).map(track).collect()).unwrap())
}

/// Running controller plus everything a test needs to observe it
pub struct TestPlayer {
    pub player: PlayerHandle,
    pub log: CallLog,
    pub video: SinkProbe,
    pub audio: SinkProbe,
    pub events: broadcast::Receiver<PlayerEvent>,
    pub location: watch::Receiver<Url>,
}

impl TestPlayer {
    /// Player over `len` tracks at `http://localhost/`, default timing
    pub fn spawn(len: usize) -> Self {
        Self::spawn_with(len, "http://localhost/", ControllerConfig::default())
    }

    pub fn spawn_with(len: usize, url: &str, config: ControllerConfig) -> Self {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let (video_sink, video) = RecordingSink::new(SinkRole::Video, &log);
        let (audio_sink, audio) = RecordingSink::new(SinkRole::Audio, &log);
        let pair = MediaHandlePair::new(Box::new(video_sink), Box::new(audio_sink)).unwrap();

        let location = QueryLocation::new(Url::parse(url).unwrap());
        let location_rx = location.subscribe();
        let events = Arc::new(EventBus::new(100));
        let events_rx = events.subscribe();

        let player =
            PlaybackController::spawn(playlist(len), pair, Box::new(location), config, events)
                .unwrap();

        Self {
            player,
            log,
            video,
            audio,
            events: events_rx,
            location: location_rx,
        }
    }

    /// Calls recorded since the last drain
    pub fn drain_log(&self) -> Vec<String> {
        std::mem::take(&mut *self.log.lock().unwrap())
    }

    /// Events received since the last drain
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }

    /// Raw `track` value currently held by the location
    pub fn location_track(&self) -> Option<String> {
        self.location
            .borrow()
            .query_pairs()
            .find(|(key, _)| key == "track")
            .map(|(_, value)| value.into_owned())
    }

    /// Occurrences of `call` in the log since the last drain
    pub fn count(&self, call: &str) -> usize {
        self.log.lock().unwrap().iter().filter(|c| *c == call).count()
    }
}
