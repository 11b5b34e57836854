//! Engine traits
//!
//! Abstract interfaces for the external speech engines. Each engine is
//! exclusively owned by one worker and is only ever called from that
//! worker's context, so implementations may block.

use std::time::Duration;

use crate::audio::AudioFragment;
use crate::error::Result;

/// Speech recognition boundary.
///
/// `recognize` blocks until an utterance is decoded or the timeout
/// elapses. A timeout is not an error: implementations return an empty
/// string and the caller restarts listening.
pub trait RecognitionEngine: Send + Sync {
    /// Listen for one utterance, bounded by `timeout`.
    fn recognize(&self, timeout: Duration) -> Result<String>;
}

/// Speech synthesis boundary.
///
/// Converts one normalized text fragment into PCM samples at the
/// engine's fixed sample rate.
pub trait SynthesisEngine: Send + Sync {
    /// Synthesize a single text fragment.
    fn synthesize(&self, text: &str) -> Result<AudioFragment>;

    /// Output sample rate in Hz.
    fn sample_rate(&self) -> u32;
}

/// Audio output boundary.
///
/// `play` blocks for approximately the fragment's real playback
/// duration; fragments are rendered strictly in arrival order.
pub trait PlaybackSink: Send + Sync {
    /// Render one audio fragment to the output device.
    fn play(&self, fragment: &AudioFragment) -> Result<()>;
}
