//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Text chunker configuration
    #[serde(default)]
    pub chunker: ChunkerSettings,

    /// Audio configuration
    #[serde(default)]
    pub audio: AudioSettings,

    /// Generation server configuration
    #[serde(default)]
    pub llm: LlmSettings,

    /// Listening loop configuration
    #[serde(default)]
    pub listen: ListenSettings,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilitySettings,
}

impl Settings {
    /// Load defaults layered with an optional file and environment
    /// overrides (`VOICE_ASSISTANT__SECTION__FIELD`).
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path).required(false));
        }
        let settings: Settings = builder
            .add_source(Environment::with_prefix("VOICE_ASSISTANT").separator("__"))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunker.max_chunk_size < 16 {
            return Err(ConfigError::InvalidValue {
                field: "chunker.max_chunk_size".to_string(),
                message: "too small for a speakable fragment (minimum 16)".to_string(),
            });
        }
        if self.audio.sample_rate == 0 {
            return Err(ConfigError::InvalidValue {
                field: "audio.sample_rate".to_string(),
                message: "sample rate must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Text chunker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkerSettings {
    /// Fragment length cap in characters
    #[serde(default = "default_max_chunk_size")]
    pub max_chunk_size: usize,
}

impl Default for ChunkerSettings {
    fn default() -> Self {
        Self {
            max_chunk_size: default_max_chunk_size(),
        }
    }
}

/// Audio configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioSettings {
    /// PCM sample rate in Hz
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
        }
    }
}

/// Generation server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Chat endpoint of the local generation server; `None` falls back
    /// to the echo backend
    #[serde(default)]
    pub server_url: Option<String>,

    /// Model name passed through to the server
    #[serde(default = "default_model")]
    pub model: String,

    /// Connect timeout for generation requests
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            server_url: None,
            model: default_model(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Listening loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenSettings {
    /// Upper bound on waiting for one utterance, in seconds
    #[serde(default = "default_utterance_timeout_secs")]
    pub utterance_timeout_secs: u64,

    /// Pause after playback before the microphone reopens, in
    /// milliseconds
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Messages spoken once at startup
    #[serde(default = "default_greetings")]
    pub greetings: Vec<String>,
}

impl Default for ListenSettings {
    fn default() -> Self {
        Self {
            utterance_timeout_secs: default_utterance_timeout_secs(),
            settle_ms: default_settle_ms(),
            greetings: default_greetings(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilitySettings {
    /// Default log level when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilitySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_max_chunk_size() -> usize {
    200
}

fn default_sample_rate() -> u32 {
    16000
}

fn default_model() -> String {
    "qwen3-0.6b".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_utterance_timeout_secs() -> u64 {
    15
}

fn default_settle_ms() -> u64 {
    1500
}

fn default_greetings() -> Vec<String> {
    vec![
        "Привет, я ваш голосовой ассистент.".to_string(),
        "Я работаю полностью локально.".to_string(),
    ]
}

fn default_log_level() -> String {
    "info".to_string()
}
