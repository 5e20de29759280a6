//! mpv-backed preview player for the playback coordinator.
//!
//! mpv runs as a separate borderless window and is driven over its JSON IPC
//! socket. Progress is learned by polling properties, which is what makes the
//! player "latency-bearing" from the coordinator's point of view.

pub mod backend;
pub mod error;
pub mod mpv;

pub use backend::{MpvBackend, WindowGeometry};
pub use error::PreviewError;
