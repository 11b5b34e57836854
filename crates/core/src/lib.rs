//! Core types for the voice assistant
//!
//! This crate provides the foundational pieces shared across all other
//! crates:
//! - Audio fragment type passed between pipeline stages
//! - Engine traits for the recognition, synthesis, and playback
//!   collaborators
//! - Error types

pub mod audio;
pub mod engines;
pub mod error;

pub use audio::AudioFragment;
pub use engines::{PlaybackSink, RecognitionEngine, SynthesisEngine};
pub use error::{Error, Result};
