//! Playback control
//!
//! [`PlaybackController`] is the only writer of playback state. Everything
//! else talks to it through a [`PlayerHandle`].

mod controller;
mod handle;
pub mod state;
pub mod view;

pub use controller::PlaybackController;
pub use handle::PlayerHandle;
pub use state::ControllerState;
pub use view::PlayerView;
