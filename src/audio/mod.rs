//! Audio ingestion pipeline
//!
//! Streams remote audio to a transient on-disk artifact, validates its
//! duration from container metadata alone, then decodes and normalizes it
//! into a mono waveform at the configured target sample rate.

pub mod decode;
pub mod duration;
pub mod fetch;
pub mod normalize;
pub mod resample;
pub mod types;

pub use fetch::{AudioFetcher, TransientAudioFile};
pub use types::{AudioReference, Waveform};
