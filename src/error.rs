//! Error types for vidblog.

use thiserror::Error;

/// Library-level error type for vidblog operations.
#[derive(Error, Debug)]
pub enum BlogError {
    #[error("Invalid YouTube URL: {0}")]
    InvalidReference(String),

    #[error("Transcript not available: {0}")]
    TranscriptUnavailable(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// The classes of failure a pipeline caller has to tell apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The video reference did not contain a video identifier.
    InvalidReference,
    /// Captions were missing, disabled or unreachable.
    TranscriptUnavailable,
    /// The outline or article generation call failed.
    GenerationFailure,
    /// Anything else.
    Internal,
}

impl BlogError {
    /// Classify this error into the pipeline taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BlogError::InvalidReference(_) => ErrorKind::InvalidReference,
            BlogError::TranscriptUnavailable(_) => ErrorKind::TranscriptUnavailable,
            BlogError::Generation(_) => ErrorKind::GenerationFailure,
            _ => ErrorKind::Internal,
        }
    }
}

/// Result type alias for vidblog operations.
pub type Result<T> = std::result::Result<T, BlogError>;
