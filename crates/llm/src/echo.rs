//! Echo backend
//!
//! Streams the utterance back in small deltas. Used by integration
//! tests and as the app's fallback when no generation server is
//! configured.

use tokio::sync::mpsc;

use crate::{DeltaStream, GenerationEvent, LlmBackend, Result};

/// Backend that replies with the utterance itself.
pub struct EchoBackend {
    /// Characters per delta
    delta_chars: usize,
}

impl EchoBackend {
    pub fn new(delta_chars: usize) -> Self {
        Self {
            delta_chars: delta_chars.max(1),
        }
    }
}

impl Default for EchoBackend {
    fn default() -> Self {
        Self::new(4)
    }
}

#[async_trait::async_trait]
impl LlmBackend for EchoBackend {
    async fn begin_stream(&self, utterance: &str) -> Result<DeltaStream> {
        let (tx, rx) = mpsc::channel(16);
        let chars: Vec<char> = utterance.chars().collect();
        let delta_chars = self.delta_chars;

        tokio::spawn(async move {
            for delta in chars.chunks(delta_chars) {
                let delta: String = delta.iter().collect();
                if tx.send(GenerationEvent::Delta(delta)).await.is_err() {
                    return;
                }
            }
            let _ = tx.send(GenerationEvent::Finished).await;
        });

        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo_streams_full_text() {
        let backend = EchoBackend::new(3);
        let mut stream = backend.begin_stream("привет мир").await.unwrap();

        let mut text = String::new();
        let mut finished = false;
        while let Some(event) = stream.recv().await {
            match event {
                GenerationEvent::Delta(delta) => text.push_str(&delta),
                GenerationEvent::Finished => {
                    finished = true;
                    break;
                }
            }
        }

        assert!(finished);
        assert_eq!(text, "привет мир");
    }
}
