//! Speech turn pipeline
//!
//! Moves reply fragments from "generated" through "synthesized" to
//! "played":
//! - [`StageChannel`]: FIFO handoff between stages with an explicit
//!   end-of-stream sentinel
//! - [`SynthesizerStage`] / [`PlayerStage`]: long-lived stage workers
//! - [`TurnCoordinator`]: per-turn in-flight accounting with an exact
//!   completion barrier and cancellation
//! - [`TurnPipeline`]: the turn-level contract (accept an utterance,
//!   inject a message, wait for completion, shut down)
//! - [`VoiceAgent`]: the listen/reply control loop

pub mod agent;
pub mod channel;
pub mod coordinator;
pub mod stages;
pub mod turn;

pub use agent::{AgentConfig, VoiceAgent};
pub use channel::StageChannel;
pub use coordinator::TurnCoordinator;
pub use stages::{PlayerStage, SynthesizerStage};
pub use turn::TurnPipeline;

use thiserror::Error;

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The generation stream failed or broke mid-reply
    #[error("Generation error: {0}")]
    Generation(String),

    /// Speech recognition failed
    #[error("Recognition error: {0}")]
    Recognition(String),
}

impl From<PipelineError> for voice_assistant_core::Error {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Generation(msg) => voice_assistant_core::Error::Generation(msg),
            PipelineError::Recognition(msg) => voice_assistant_core::Error::Recognition(msg),
        }
    }
}
