//! Voice classification backends
//!
//! A prediction backend is chosen exactly once at startup and injected into
//! the pipeline: the ONNX model variant when a model file is configured and
//! loads, otherwise the deterministic duration heuristic. No call site
//! re-checks model availability afterwards.

pub mod fallback;
pub mod model;

use crate::audio::types::Waveform;
use crate::config::DetectionConfig;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

pub use fallback::FallbackBackend;
pub use model::OnnxBackend;

/// Classification outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    #[serde(rename = "AI_GENERATED")]
    AiGenerated,
    #[serde(rename = "HUMAN")]
    Human,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::AiGenerated => write!(f, "AI_GENERATED"),
            Label::Human => write!(f, "HUMAN"),
        }
    }
}

/// A label with its calibrated confidence in [0, 1]
#[derive(Debug, Clone, Copy)]
pub struct Prediction {
    pub label: Label,
    pub confidence: f32,
}

/// Classifier capability over a decoded waveform.
///
/// A shared backend instance must be safe for concurrent `predict` calls;
/// both provided implementations are (the model serializes its session
/// internally, the heuristic is stateless).
pub trait InferenceBackend: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Version string reported in detection results
    fn model_version(&self) -> &str;

    /// Classify the waveform, returning a label and confidence in [0, 1]
    fn predict(&self, waveform: &Waveform) -> Result<Prediction>;
}

/// Select the process-wide backend once at startup.
///
/// Tries the configured model first; absence or a load failure falls back to
/// the duration heuristic with a warning rather than failing startup.
pub fn select_backend(config: &DetectionConfig) -> Arc<dyn InferenceBackend> {
    if let Some(model_path) = &config.model_path {
        match OnnxBackend::load(model_path, &config.model_version) {
            Ok(backend) => {
                info!(path = %model_path.display(), "loaded ONNX classifier");
                return Arc::new(backend);
            }
            Err(e) => {
                warn!(error = %e, "model unavailable, using heuristic backend");
            }
        }
    } else {
        info!("no model path configured, using heuristic backend");
    }

    Arc::new(FallbackBackend::new(config.model_version.clone()))
}
