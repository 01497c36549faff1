//! Cloneable front end to the controller task

use super::view::PlayerView;
use crate::error::{Error, Result};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use vamp_common::events::{EventBus, PlayerEvent};

/// Where a track change should land
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Target {
    Next,
    Previous,
    /// Any integer position; wrapped into the playlist
    Index(usize),
}

pub(crate) enum Command {
    Toggle {
        reply: oneshot::Sender<Result<PlayerView>>,
    },
    Advance {
        target: Target,
        reply: oneshot::Sender<PlayerView>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Handle to a running player
///
/// Commands are processed in the order they are sent. Every method fails
/// with [`Error::ControllerGone`] once the controller task has stopped.
#[derive(Clone)]
pub struct PlayerHandle {
    commands: mpsc::Sender<Command>,
    view: watch::Receiver<PlayerView>,
    events: Arc<EventBus>,
}

impl PlayerHandle {
    pub(crate) fn new(
        commands: mpsc::Sender<Command>,
        view: watch::Receiver<PlayerView>,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            commands,
            view,
            events,
        }
    }

    /// Flip between playing and paused
    ///
    /// A rejected play comes back as [`Error::Playback`]; the player is left
    /// paused with both sinks stopped.
    pub async fn toggle_playback(&self) -> Result<PlayerView> {
        self.request(|reply| Command::Toggle { reply }).await?
    }

    /// Advance to the following track (wraps to the first)
    pub async fn next(&self) -> Result<PlayerView> {
        self.advance(Target::Next).await
    }

    /// Go back to the preceding track (wraps to the last)
    pub async fn previous(&self) -> Result<PlayerView> {
        self.advance(Target::Previous).await
    }

    /// Jump to a playlist position, wrapped into range
    pub async fn advance_to(&self, index: usize) -> Result<PlayerView> {
        self.advance(Target::Index(index)).await
    }

    /// Stop playback, release both sources and end the controller task
    pub async fn shutdown(&self) -> Result<()> {
        self.request(|reply| Command::Shutdown { reply }).await
    }

    /// Latest published view
    pub fn view(&self) -> PlayerView {
        self.view.borrow().clone()
    }

    /// Observe view updates
    pub fn watch_view(&self) -> watch::Receiver<PlayerView> {
        self.view.clone()
    }

    /// Subscribe to player events
    pub fn subscribe_events(&self) -> broadcast::Receiver<PlayerEvent> {
        self.events.subscribe()
    }

    /// False once the controller task has stopped
    pub fn is_running(&self) -> bool {
        !self.commands.is_closed()
    }

    async fn advance(&self, target: Target) -> Result<PlayerView> {
        self.request(|reply| Command::Advance { target, reply }).await
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(command(reply_tx))
            .await
            .map_err(|_| Error::ControllerGone)?;
        reply_rx.await.map_err(|_| Error::ControllerGone)
    }
}
