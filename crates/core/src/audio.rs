//! Audio fragment type
//!
//! A fragment is one synthesized unit of speech, owned by the audio
//! stage channel until the player consumes it.

use std::sync::Arc;
use std::time::Duration;

/// An ordered sequence of PCM samples at a fixed sample rate.
///
/// Fragments are produced by the synthesizer stage and played back
/// strictly in arrival order, never overlapped.
#[derive(Debug, Clone)]
pub struct AudioFragment {
    /// Mono PCM samples in `[-1.0, 1.0]`
    pub samples: Arc<[f32]>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl AudioFragment {
    /// Create a fragment from raw samples.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples: samples.into(),
            sample_rate,
        }
    }

    /// Approximate playback duration of this fragment.
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if the fragment carries no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
