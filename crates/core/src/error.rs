//! Error types shared across the workspace

use thiserror::Error;

/// Top-level error type for the voice assistant.
#[derive(Debug, Error)]
pub enum Error {
    /// Speech recognition failed
    #[error("Recognition error: {0}")]
    Recognition(String),

    /// Text generation failed or the stream transport broke
    #[error("Generation error: {0}")]
    Generation(String),

    /// Speech synthesis failed for a fragment
    #[error("Synthesis error: {0}")]
    Synthesis(String),

    /// Audio output failed for a fragment
    #[error("Playback error: {0}")]
    Playback(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type used across the workspace.
pub type Result<T> = std::result::Result<T, Error>;
