use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Tunables for the playback loop. Missing JSON fields take the defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlaybackConfig {
    /// How close to the end (seconds) counts as "reached the end".
    pub end_epsilon: f64,
    /// Jump (seconds) that counts as a seek rather than playback progress.
    /// Applies to the visual playhead and to a playing player.
    pub seek_threshold: f64,
    /// How far (seconds) a paused player may sit from the playhead before it
    /// is seeked.
    pub seek_tolerance: f64,
    pub frame_interval_ms: u64,
    pub poll_interval_ms: u64,
    /// Upper bound on coordinator feedback rounds per dispatch.
    pub max_settle_rounds: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            end_epsilon: 0.01,
            seek_threshold: 0.15,
            seek_tolerance: 0.05,
            frame_interval_ms: 16,
            poll_interval_ms: 50,
            max_settle_rounds: 8,
        }
    }
}

impl PlaybackConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
