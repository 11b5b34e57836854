//! Generation engine boundary
//!
//! The pipeline consumes the language model purely as an incremental
//! stream of text deltas. This crate defines that boundary
//! ([`LlmBackend`], [`GenerationEvent`]) plus two implementations: a
//! streaming HTTP client for a local OpenAI-compatible server, and an
//! echo backend for tests and serverless operation.

pub mod echo;
pub mod http;

use thiserror::Error;
use tokio::sync::mpsc;

pub use echo::EchoBackend;
pub use http::HttpLlmClient;

/// One event on the delta stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationEvent {
    /// More reply content
    Delta(String),
    /// Terminal: no further deltas for this request
    Finished,
}

/// Receiving half of a generation stream.
///
/// The channel closing without a `Finished` event means the transport
/// broke mid-reply; the consumer treats that as a turn abort.
pub type DeltaStream = mpsc::Receiver<GenerationEvent>;

/// Generation errors
#[derive(Debug, Error)]
pub enum LlmError {
    /// Failed to reach the generation server
    #[error("Connection error: {0}")]
    Connection(String),

    /// Server answered with a non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Client construction failed
    #[error("Client error: {0}")]
    Client(String),
}

/// Result type for generation calls.
pub type Result<T> = std::result::Result<T, LlmError>;

/// A language model that answers one utterance with a delta stream.
#[async_trait::async_trait]
pub trait LlmBackend: Send + Sync {
    /// Send the utterance and return the reply's delta stream.
    async fn begin_stream(&self, utterance: &str) -> Result<DeltaStream>;
}
