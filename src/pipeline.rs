//! Detection pipeline orchestration
//!
//! Sequences fetch → duration check → decode → normalize → predict. The
//! transient artifact is owned by the request body, so every exit path —
//! early return, cancellation of the fetch, or success — releases it exactly
//! once, and the originating typed failure propagates unchanged.

use crate::audio::types::AudioReference;
use crate::audio::{decode, duration, normalize, AudioFetcher};
use crate::config::DetectionConfig;
use crate::error::Result;
use crate::inference::{InferenceBackend, Label};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Final outcome of one successful detection run
#[derive(Debug, Clone)]
pub struct DetectionResult {
    pub label: Label,
    pub confidence: f32,
    pub model_version: String,
    /// Elapsed time measured from the start of decoding (fetch excluded)
    pub processing_time: Duration,
}

/// End-to-end detection pipeline with an injected classifier backend
pub struct DetectionPipeline {
    config: DetectionConfig,
    fetcher: AudioFetcher,
    backend: Arc<dyn InferenceBackend>,
}

impl DetectionPipeline {
    pub fn new(config: DetectionConfig, backend: Arc<dyn InferenceBackend>) -> Result<Self> {
        let fetcher = AudioFetcher::new(&config)?;
        Ok(Self {
            config,
            fetcher,
            backend,
        })
    }

    pub fn backend(&self) -> &dyn InferenceBackend {
        self.backend.as_ref()
    }

    /// Run the full pipeline for one audio reference.
    pub async fn detect(&self, reference: &AudioReference) -> Result<DetectionResult> {
        let artifact = self.fetcher.fetch(reference).await?;

        let metadata_duration = duration::check(artifact.path(), self.config.max_duration_secs)?;
        debug!(duration_secs = metadata_duration, "duration check passed");

        let started = Instant::now();

        let waveform = decode::decode(
            artifact.path(),
            self.config.target_sample_rate,
            self.config.max_duration_secs,
        )?;
        let waveform = normalize::normalize(waveform);

        let prediction = self.backend.predict(&waveform)?;
        let processing_time = started.elapsed();

        info!(
            label = %prediction.label,
            confidence = prediction.confidence,
            backend = self.backend.name(),
            elapsed_ms = processing_time.as_millis() as u64,
            "detection complete"
        );

        Ok(DetectionResult {
            label: prediction.label,
            confidence: prediction.confidence,
            model_version: self.backend.model_version().to_string(),
            processing_time,
        })
    }
}
