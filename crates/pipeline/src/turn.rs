//! Turn pipeline
//!
//! Owns the stage channels, the coordinator, the per-turn chunker, and
//! the two stage workers. Workers are spawned once at construction and
//! outlive individual turns; only the coordinator's counter and
//! cancellation flag are per-turn state.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

use voice_assistant_core::{AudioFragment, PlaybackSink, SynthesisEngine};
use voice_assistant_llm::{GenerationEvent, LlmBackend};
use voice_assistant_text::StreamChunker;

use crate::channel::StageChannel;
use crate::coordinator::TurnCoordinator;
use crate::stages::{PlayerStage, SynthesizerStage};
use crate::PipelineError;

/// The turn-level contract exposed to the control loop.
pub struct TurnPipeline {
    text_tx: Arc<StageChannel<(u64, String)>>,
    audio: Arc<StageChannel<(u64, AudioFragment)>>,
    coordinator: Arc<TurnCoordinator>,
    chunker: Mutex<StreamChunker>,
    synth_handle: Mutex<Option<JoinHandle<()>>>,
    player_handle: Mutex<Option<JoinHandle<()>>>,
}

impl TurnPipeline {
    /// Spawn both stage workers. Must be called inside a tokio
    /// runtime; the workers run on blocking threads for the process's
    /// lifetime.
    pub fn spawn<S, P>(synthesizer: S, sink: P, max_chunk_size: usize) -> Self
    where
        S: SynthesisEngine + 'static,
        P: PlaybackSink + 'static,
    {
        let text_tx = Arc::new(StageChannel::new());
        let audio = Arc::new(StageChannel::new());
        let coordinator = Arc::new(TurnCoordinator::new());

        let synth_stage = SynthesizerStage::new(
            synthesizer,
            text_tx.clone(),
            audio.clone(),
            coordinator.clone(),
        );
        let player_stage = PlayerStage::new(sink, audio.clone(), coordinator.clone());

        let synth_handle = tokio::task::spawn_blocking(move || synth_stage.run());
        let player_handle = tokio::task::spawn_blocking(move || player_stage.run());

        Self {
            text_tx,
            audio,
            coordinator,
            chunker: Mutex::new(StreamChunker::new(max_chunk_size)),
            synth_handle: Mutex::new(Some(synth_handle)),
            player_handle: Mutex::new(Some(player_handle)),
        }
    }

    /// Inject a fixed message (e.g. a greeting) as if it were model
    /// output. The text goes to synthesis as-is.
    pub fn enqueue_spoken_message(&self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let epoch = self.coordinator.fragment_produced();
        self.text_tx.send((epoch, text.to_string()));
    }

    /// Begin a turn for an accepted utterance: cancel any unfinished
    /// prior speech, then drive the reply's delta stream through the
    /// chunker into the synthesis channel.
    ///
    /// A transport failure mid-stream aborts the turn with an error,
    /// but everything already chunked still plays; partial replies are
    /// acceptable.
    pub async fn accept_utterance<L: LlmBackend>(
        &self,
        llm: &L,
        utterance: &str,
    ) -> Result<(), PipelineError> {
        self.cancel_turn();
        self.coordinator.begin_turn();
        self.chunker.lock().reset();

        let mut stream = llm
            .begin_stream(utterance)
            .await
            .map_err(|e| PipelineError::Generation(e.to_string()))?;

        let mut finished = false;
        while let Some(event) = stream.recv().await {
            match event {
                GenerationEvent::Delta(delta) => {
                    let fragments = self.chunker.lock().feed_str(&delta);
                    for fragment in fragments {
                        self.dispatch(fragment);
                    }
                }
                GenerationEvent::Finished => {
                    finished = true;
                    break;
                }
            }
        }

        let tail = self.chunker.lock().flush();
        if let Some(fragment) = tail {
            self.dispatch(fragment);
        }

        if !finished {
            return Err(PipelineError::Generation(
                "delta stream ended without a finish marker".to_string(),
            ));
        }
        Ok(())
    }

    fn dispatch(&self, fragment: String) {
        tracing::debug!(chars = fragment.chars().count(), "Fragment queued for synthesis");
        let epoch = self.coordinator.fragment_produced();
        self.text_tx.send((epoch, fragment));
    }

    /// Discard everything still in flight and zero the barrier. A
    /// fragment already mid-playback on the device finishes; the next
    /// turn must not overlap it on the output.
    pub fn cancel_turn(&self) {
        let dropped = self.text_tx.drain() + self.audio.drain();
        self.coordinator.cancel();
        if dropped > 0 {
            tracing::debug!(dropped, "Turn cancelled, queued fragments discarded");
        }
    }

    /// Block until all speech queued for the current turn has finished
    /// playing.
    pub async fn wait_for_turn_complete(&self) {
        self.coordinator.await_complete().await;
    }

    /// Propagate the end-of-stream sentinel through both stages and
    /// wait for the workers to terminate. Used at process shutdown.
    pub async fn shutdown(&self) {
        self.text_tx.close();
        let synth = self.synth_handle.lock().take();
        if let Some(handle) = synth {
            let _ = handle.await;
        }
        let player = self.player_handle.lock().take();
        if let Some(handle) = player {
            let _ = handle.await;
        }
        tracing::debug!("Pipeline shut down");
    }

    /// Fragments produced but not yet fully played.
    pub fn in_flight(&self) -> usize {
        self.coordinator.in_flight()
    }
}
