//! Streaming text normalization for speech synthesis
//!
//! This crate turns raw model-generated text into speakable Russian:
//! - `StreamChunker`: character-level incremental normalizer that cuts
//!   the stream into synthesis-ready fragments
//! - `numerals`: spelled-out Russian cardinals
//! - `translit`: symbol pronunciations and Latin-script transliteration

pub mod chunker;
pub mod numerals;
pub mod translit;

pub use chunker::{normalize, StreamChunker, DEFAULT_MAX_CHUNK_SIZE};
