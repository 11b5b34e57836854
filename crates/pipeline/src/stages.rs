//! Stage workers
//!
//! One long-lived blocking worker per stage, spawned once at startup
//! and living across turns. Engine failures are logged and swallowed
//! at fragment granularity; a failed fragment is still debited from
//! the coordinator so the completion barrier cannot hang.

use std::sync::Arc;

use voice_assistant_core::{AudioFragment, PlaybackSink, SynthesisEngine};

use crate::channel::StageChannel;
use crate::coordinator::TurnCoordinator;

/// Consumes text fragments, produces audio fragments. Payloads carry
/// the turn epoch they were produced under so the coordinator can tell
/// a pre-empted turn's fragment from a current one.
pub struct SynthesizerStage<S> {
    engine: S,
    text_rx: Arc<StageChannel<(u64, String)>>,
    audio_tx: Arc<StageChannel<(u64, AudioFragment)>>,
    coordinator: Arc<TurnCoordinator>,
}

impl<S: SynthesisEngine> SynthesizerStage<S> {
    pub fn new(
        engine: S,
        text_rx: Arc<StageChannel<(u64, String)>>,
        audio_tx: Arc<StageChannel<(u64, AudioFragment)>>,
        coordinator: Arc<TurnCoordinator>,
    ) -> Self {
        Self {
            engine,
            text_rx,
            audio_tx,
            coordinator,
        }
    }

    /// Run until the sentinel arrives, then forward it downstream.
    pub fn run(self) {
        tracing::debug!("Synthesizer stage started");
        while let Some((epoch, text)) = self.text_rx.recv() {
            match self.engine.synthesize(&text) {
                Ok(fragment) => {
                    tracing::trace!(
                        chars = text.chars().count(),
                        samples = fragment.len(),
                        "Fragment synthesized"
                    );
                    self.audio_tx.send((epoch, fragment));
                }
                Err(e) => {
                    // Dropped fragment still counts as consumed or the
                    // completion barrier would never clear.
                    tracing::warn!("Synthesis failed, dropping fragment: {}", e);
                    self.coordinator.fragment_consumed(epoch);
                }
            }
        }
        self.audio_tx.close();
        tracing::debug!("Synthesizer stage stopped");
    }
}

/// Consumes audio fragments, renders them in strict arrival order.
pub struct PlayerStage<P> {
    sink: P,
    audio_rx: Arc<StageChannel<(u64, AudioFragment)>>,
    coordinator: Arc<TurnCoordinator>,
}

impl<P: PlaybackSink> PlayerStage<P> {
    pub fn new(
        sink: P,
        audio_rx: Arc<StageChannel<(u64, AudioFragment)>>,
        coordinator: Arc<TurnCoordinator>,
    ) -> Self {
        Self {
            sink,
            audio_rx,
            coordinator,
        }
    }

    /// Run until the sentinel arrives. Each `play` call blocks for
    /// roughly the fragment's real duration; fragments never overlap.
    pub fn run(self) {
        tracing::debug!("Player stage started");
        while let Some((epoch, fragment)) = self.audio_rx.recv() {
            tracing::trace!(duration_ms = fragment.duration().as_millis() as u64, "Playing fragment");
            if let Err(e) = self.sink.play(&fragment) {
                tracing::warn!("Playback failed, dropping fragment: {}", e);
            }
            self.coordinator.fragment_consumed(epoch);
        }
        tracing::debug!("Player stage stopped");
    }
}
