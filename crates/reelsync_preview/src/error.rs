use reelsync_playback::error::PlaybackError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("Failed to start mpv: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("mpv socket did not appear at {}", .0.display())]
    SocketTimeout(PathBuf),

    #[error("mpv rejected command: {0}")]
    Ipc(String),

    #[error("Invalid window geometry: {0}")]
    InvalidGeometry(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PreviewError>;

impl From<PreviewError> for PlaybackError {
    fn from(e: PreviewError) -> Self {
        PlaybackError::Backend(e.to_string())
    }
}
