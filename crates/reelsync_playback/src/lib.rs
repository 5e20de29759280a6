//! Keeps the authoritative editor state and a latency-bearing media player in
//! step.
//!
//! [`coordinator::PlaybackCoordinator`] is the only adapter between editor
//! time and player time. [`session::EditorSession`] wires it to the reducer
//! and the [`playhead::PlayheadClock`].

pub mod backend;
pub mod config;
pub mod controller;
pub mod coordinator;
pub mod error;
pub mod frame;
pub mod playhead;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;
