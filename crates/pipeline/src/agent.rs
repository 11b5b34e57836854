//! Listen/reply control loop
//!
//! Single-threaded cooperative flow over the pipeline: queue the
//! greetings, wait for the barrier, then listen, accept, speak, wait,
//! settle, and listen again. The microphone never reopens until the
//! turn's speech has fully finished and the echo had time to decay.

use std::sync::Arc;
use std::time::Duration;

use voice_assistant_core::RecognitionEngine;
use voice_assistant_llm::LlmBackend;

use crate::turn::TurnPipeline;

/// Control loop configuration.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Upper bound on waiting for one utterance
    pub listen_timeout: Duration,
    /// Pause after playback before the microphone reopens, so the
    /// device output cannot be heard as input
    pub settle: Duration,
    /// Messages spoken once at startup
    pub greetings: Vec<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            listen_timeout: Duration::from_secs(15),
            settle: Duration::from_millis(1500),
            greetings: Vec::new(),
        }
    }
}

/// The turn-driving control flow.
pub struct VoiceAgent<R, L> {
    recognizer: Arc<R>,
    llm: L,
    pipeline: Arc<TurnPipeline>,
    config: AgentConfig,
}

impl<R, L> VoiceAgent<R, L>
where
    R: RecognitionEngine + 'static,
    L: LlmBackend,
{
    pub fn new(recognizer: R, llm: L, pipeline: Arc<TurnPipeline>, config: AgentConfig) -> Self {
        Self {
            recognizer: Arc::new(recognizer),
            llm,
            pipeline,
            config,
        }
    }

    /// Run forever. Nothing in the loop is fatal: timeouts restart
    /// listening, generation failures abort the turn and the already
    /// queued speech still plays.
    pub async fn run(&self) {
        for greeting in &self.config.greetings {
            self.pipeline.enqueue_spoken_message(greeting);
        }
        self.pipeline.wait_for_turn_complete().await;
        tracing::info!("Greetings played, listening");

        loop {
            let utterance = match self.listen().await {
                Ok(utterance) => utterance,
                Err(e) => {
                    tracing::warn!("Recognition failed: {}", e);
                    continue;
                }
            };
            if utterance.trim().is_empty() {
                tracing::debug!("Nothing recognized, listening again");
                continue;
            }

            tracing::info!(utterance = %utterance, "Utterance accepted");
            if let Err(e) = self.pipeline.accept_utterance(&self.llm, &utterance).await {
                tracing::warn!("Turn aborted: {}", e);
            }

            self.pipeline.wait_for_turn_complete().await;
            tokio::time::sleep(self.config.settle).await;
        }
    }

    /// Bounded blocking recognition on a worker thread; the control
    /// flow itself only awaits.
    async fn listen(&self) -> Result<String, crate::PipelineError> {
        let recognizer = self.recognizer.clone();
        let timeout = self.config.listen_timeout;
        tokio::task::spawn_blocking(move || recognizer.recognize(timeout))
            .await
            .map_err(|e| crate::PipelineError::Recognition(e.to_string()))?
            .map_err(|e| crate::PipelineError::Recognition(e.to_string()))
    }
}
