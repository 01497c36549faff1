//! HTTP control surface
//!
//! Thin axum layer over a [`PlayerHandle`](crate::playback::PlayerHandle):
//! read the published view, send commands, stream events over SSE.

pub mod handlers;
pub mod server;
pub mod sse;

pub use server::{create_router, run, AppContext};
