use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaybackError {
    /// A load or seek reached the player before it was bound to a surface.
    /// This is a lifecycle bug in the caller, not a runtime condition.
    #[error("player not initialized")]
    NotInitialized,

    #[error("player backend error: {0}")]
    Backend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PlaybackError>;
