//! Console engine adapters
//!
//! Stand-ins for the on-device speech engines so the pipeline can run
//! end to end on a development machine: utterances are typed on stdin,
//! synthesis produces silence proportional to the text, and playback
//! sleeps for the fragment's real duration.

use std::io::BufRead;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use voice_assistant_core::{
    AudioFragment, Error, PlaybackSink, RecognitionEngine, Result, SynthesisEngine,
};

/// Approximate speech pacing for the silence synthesizer: 50 ms of
/// audio per character.
const SAMPLES_PER_CHAR_DIVISOR: u32 = 20;

/// Reads "utterances" from stdin lines. A persistent reader thread
/// feeds a channel so `recognize` can honor its timeout.
pub struct ConsoleRecognizer {
    lines: std::sync::Mutex<mpsc::Receiver<String>>,
}

impl ConsoleRecognizer {
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            return;
                        }
                    }
                    Err(_) => return,
                }
            }
        });
        Self {
            lines: std::sync::Mutex::new(rx),
        }
    }
}

impl RecognitionEngine for ConsoleRecognizer {
    fn recognize(&self, timeout: Duration) -> Result<String> {
        let lines = self.lines.lock().map_err(|_| {
            Error::Recognition("reader thread poisoned the line channel".to_string())
        })?;
        match lines.recv_timeout(timeout) {
            Ok(line) => Ok(line),
            // Timeout is silence, not an error
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(String::new()),
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                Err(Error::Recognition("stdin closed".to_string()))
            }
        }
    }
}

/// Produces silence proportional to the fragment text length.
pub struct SilenceSynthesizer {
    sample_rate: u32,
}

impl SilenceSynthesizer {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }
}

impl SynthesisEngine for SilenceSynthesizer {
    fn synthesize(&self, text: &str) -> Result<AudioFragment> {
        let samples_per_char = (self.sample_rate / SAMPLES_PER_CHAR_DIVISOR) as usize;
        let samples = vec![0.0f32; text.chars().count() * samples_per_char];
        Ok(AudioFragment::new(samples, self.sample_rate))
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// Renders nothing, but blocks for the fragment's real duration like a
/// physical output device would.
pub struct NullSink;

impl PlaybackSink for NullSink {
    fn play(&self, fragment: &AudioFragment) -> Result<()> {
        tracing::info!(
            duration_ms = fragment.duration().as_millis() as u64,
            "Playing fragment"
        );
        thread::sleep(fragment.duration());
        Ok(())
    }
}
