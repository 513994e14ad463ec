//! ONNX model classifier
//!
//! Wraps an ONNX Runtime session loaded once at startup. The session sits
//! behind a mutex, so a single shared backend instance is safe for
//! concurrent prediction calls. Device placement stays inside ort; callers
//! only ever observe "available or not".

use crate::audio::types::Waveform;
use crate::error::{Error, Result};
use crate::inference::{InferenceBackend, Label, Prediction};
use ort::inputs;
use ort::session::{builder::SessionBuilder, Session};
use ort::value::Value;
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

/// Classifier backed by an ONNX Runtime session
#[derive(Debug)]
pub struct OnnxBackend {
    session: Mutex<Session>,
    model_version: String,
}

impl OnnxBackend {
    /// Load the model from disk. Any failure here means the backend is
    /// unavailable and selection falls through to the heuristic.
    pub fn load(model_path: &Path, model_version: &str) -> Result<Self> {
        if !model_path.is_file() {
            return Err(Error::Config(format!(
                "model file not found: {}",
                model_path.display()
            )));
        }

        // Global ort environment; a second init is a no-op
        let _ = ort::init().with_name("voxguard").commit();

        // intra_threads=1: prediction runs on request tasks, not a pool
        let session = SessionBuilder::new()
            .and_then(|builder| builder.with_intra_threads(1))
            .and_then(|builder| builder.commit_from_file(model_path))
            .map_err(|e| Error::Inference(format!("failed to load model: {e}")))?;

        Ok(Self {
            session: Mutex::new(session),
            model_version: model_version.to_string(),
        })
    }

    /// Map raw model output to a prediction.
    ///
    /// Two logits are treated as (human, ai) and softmaxed; a single logit
    /// is treated as the AI score through a sigmoid.
    fn interpret(logits: &[f32]) -> Result<Prediction> {
        let ai_probability = match logits.len() {
            2 => {
                let max = logits[0].max(logits[1]);
                let exp_human = (logits[0] - max).exp();
                let exp_ai = (logits[1] - max).exp();
                exp_ai / (exp_human + exp_ai)
            }
            1 => 1.0 / (1.0 + (-logits[0]).exp()),
            n => {
                return Err(Error::Inference(format!(
                    "unexpected model output size {n}"
                )))
            }
        };

        let human_probability = 1.0 - ai_probability;
        let label = if ai_probability > 0.5 {
            Label::AiGenerated
        } else {
            Label::Human
        };
        let confidence = ai_probability.max(human_probability).clamp(0.0, 1.0);

        Ok(Prediction { label, confidence })
    }
}

impl InferenceBackend for OnnxBackend {
    fn name(&self) -> &'static str {
        "onnx-model"
    }

    fn model_version(&self) -> &str {
        &self.model_version
    }

    fn predict(&self, waveform: &Waveform) -> Result<Prediction> {
        debug!(samples = waveform.len(), "running model inference");

        let input = Value::from_array((vec![1usize, waveform.len()], waveform.samples.clone()))
            .map_err(|e| Error::Inference(e.to_string()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| Error::Inference("model session lock poisoned".to_string()))?;

        let outputs = session
            .run(inputs![input])
            .map_err(|e| Error::Inference(e.to_string()))?;

        let (_, logits) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| Error::Inference(e.to_string()))?;

        Self::interpret(logits)
    }
}
