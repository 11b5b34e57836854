//! Settings for the voice assistant
//!
//! Defaults, then an optional TOML file, then `VOICE_ASSISTANT__*`
//! environment overrides.

mod settings;

pub use settings::{
    AudioSettings, ChunkerSettings, ListenSettings, LlmSettings, ObservabilitySettings, Settings,
};

use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Loading or deserializing the configuration sources failed
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A value is out of its valid range
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}
