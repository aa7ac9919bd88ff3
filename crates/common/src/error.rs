//! Common error types.

use thiserror::Error;

/// Error type shared by the scene and canvas crates.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Failed to draw: {0}")]
    UnresolvedImage(String),

    #[error("Codec error: {0}")]
    Codec(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Shape not found: {0}")]
    ShapeNotFound(u64),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

pub type SceneResult<T> = Result<T, SceneError>;

impl SceneError {
    pub fn unresolved(image_id: impl Into<String>) -> Self {
        Self::UnresolvedImage(image_id.into())
    }

    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }

    pub fn image(msg: impl Into<String>) -> Self {
        Self::Image(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidOperation(msg.into())
    }

    /// Whether the error only means "nothing was drawn this tick".
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnresolvedImage(_))
    }
}
