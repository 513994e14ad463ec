//! # voxguard
//!
//! AI-generated voice detection service.
//!
//! **Purpose:** Fetch a remote audio resource under strict time and size
//! budgets, decode and normalize it into a fixed-format mono waveform, and
//! classify it as AI-generated or human speech with a calibrated confidence.
//!
//! **Architecture:** Streaming fetch (reqwest) → duration guard and decode
//! (symphonia/hound + rubato) → normalization → pluggable inference backend
//! (ort model or deterministic heuristic), sequenced by [`DetectionPipeline`]
//! and exposed over a thin axum HTTP surface.

pub mod api;
pub mod audio;
pub mod config;
pub mod error;
pub mod inference;
pub mod pipeline;

pub use config::DetectionConfig;
pub use error::{Error, ErrorKind, Result};
pub use pipeline::{DetectionPipeline, DetectionResult};
