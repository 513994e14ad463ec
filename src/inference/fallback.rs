//! Deterministic fallback classifier
//!
//! Used whenever no trained model is available. The policy is keyed only on
//! waveform duration, so identical inputs always produce identical output.

use crate::audio::types::Waveform;
use crate::error::Result;
use crate::inference::{InferenceBackend, Label, Prediction};
use tracing::debug;

/// Duration-keyed heuristic backend
pub struct FallbackBackend {
    model_version: String,
}

impl FallbackBackend {
    pub fn new(model_version: String) -> Self {
        Self { model_version }
    }
}

impl InferenceBackend for FallbackBackend {
    fn name(&self) -> &'static str {
        "duration-heuristic"
    }

    fn model_version(&self) -> &str {
        &self.model_version
    }

    fn predict(&self, waveform: &Waveform) -> Result<Prediction> {
        let duration = waveform.duration_seconds();

        let (label, confidence) = if duration < 1.0 {
            (Label::Human, 0.60)
        } else if duration <= 10.0 {
            (Label::Human, 0.65)
        } else {
            (Label::AiGenerated, 0.70)
        };

        debug!(
            duration_secs = duration,
            label = %label,
            confidence,
            "heuristic prediction"
        );

        Ok(Prediction { label, confidence })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn waveform_of_seconds(seconds: f64) -> Waveform {
        let rate = 16_000u32;
        Waveform::new(vec![0.1; (seconds * rate as f64) as usize], rate, 1)
    }

    fn backend() -> FallbackBackend {
        FallbackBackend::new("1.0.0".to_string())
    }

    #[test]
    fn test_short_audio_is_human() {
        let prediction = backend().predict(&waveform_of_seconds(0.5)).unwrap();
        assert_eq!(prediction.label, Label::Human);
        assert_eq!(prediction.confidence, 0.60);
    }

    #[test]
    fn test_medium_audio_is_human() {
        let prediction = backend().predict(&waveform_of_seconds(5.0)).unwrap();
        assert_eq!(prediction.label, Label::Human);
        assert_eq!(prediction.confidence, 0.65);
    }

    #[test]
    fn test_long_audio_is_ai_generated() {
        // 12-second clip crosses the 10-second threshold
        let prediction = backend().predict(&waveform_of_seconds(12.0)).unwrap();
        assert_eq!(prediction.label, Label::AiGenerated);
        assert_eq!(prediction.confidence, 0.70);
    }

    #[test]
    fn test_prediction_is_reproducible() {
        let backend = backend();
        let waveform = waveform_of_seconds(12.0);

        let first = backend.predict(&waveform).unwrap();
        let second = backend.predict(&waveform).unwrap();

        assert_eq!(first.label, second.label);
        assert_eq!(first.confidence, second.confidence);
    }

    #[test]
    fn test_boundary_durations() {
        // Exactly 1.0s and 10.0s both land in the middle band
        let at_one = backend().predict(&waveform_of_seconds(1.0)).unwrap();
        assert_eq!(at_one.confidence, 0.65);

        let at_ten = backend().predict(&waveform_of_seconds(10.0)).unwrap();
        assert_eq!(at_ten.label, Label::Human);
        assert_eq!(at_ten.confidence, 0.65);
    }

    #[test]
    fn test_confidence_in_range() {
        for seconds in [0.2, 1.0, 3.0, 10.0, 25.0] {
            let prediction = backend().predict(&waveform_of_seconds(seconds)).unwrap();
            assert!((0.0..=1.0).contains(&prediction.confidence));
        }
    }
}
