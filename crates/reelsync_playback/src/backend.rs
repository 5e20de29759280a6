use crate::error::Result;
use std::fmt::Debug;

/// Asynchronous notifications from the player, in the order they happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerEvent {
    /// Current position inside the loaded source, in seconds.
    TimeUpdate(f64),
    /// The loaded source played to its end.
    Ended,
    /// The loaded source can now be seeked.
    MetadataReady,
}

/// The opaque media player the coordinator drives.
///
/// Implementations only need to do what they are told; seek queueing,
/// duplicate-source suppression and play-failure handling live in
/// [`crate::controller::PlayerController`].
pub trait MediaBackend {
    /// Whatever the player renders into (a window, a canvas id, ...).
    type Surface: Clone + PartialEq + Debug;

    fn open(&mut self, surface: &Self::Surface) -> Result<()>;
    fn set_source(&mut self, locator: &str) -> Result<()>;
    /// Whether the current source's metadata is loaded and seeks will land.
    fn has_metadata(&self) -> bool;
    fn set_position(&mut self, seconds: f64) -> Result<()>;
    /// May be rejected (e.g. blocked autoplay).
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self) -> Result<()>;
    /// Drain events produced since the last call.
    fn poll_events(&mut self) -> Vec<PlayerEvent>;
    fn close(&mut self);
}
