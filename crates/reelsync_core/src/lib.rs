//! Timeline model and authoritative editor state for reelsync.
//!
//! Everything in this crate is pure: segment resolution, timeline arithmetic,
//! overlay geometry and the reducer that turns [`action::EditorAction`]s into
//! new [`types::EditorState`] snapshots. Playback against a real player lives
//! in `reelsync_playback`.

pub mod action;
pub mod arrange;
pub mod editing;
pub mod error;
pub mod export;
pub mod geometry;
pub mod reducer;
pub mod resolve;
pub mod scale;
pub mod types;
