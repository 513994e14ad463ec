//! Waveform amplitude normalization

use crate::audio::types::Waveform;

/// Guards against division by zero and an exact-unity peak.
const EPSILON: f32 = 1e-8;

/// Rescale the waveform so its peak magnitude sits just below 1.0.
///
/// Every sample is divided by `(max_abs + EPSILON)`; an all-zero waveform is
/// returned unchanged. Re-applying to already-normalized audio shifts values
/// only by a factor bounded by EPSILON and never produces NaN or Inf.
pub fn normalize(mut waveform: Waveform) -> Waveform {
    let peak = waveform.peak();
    if peak > 0.0 {
        let scale = 1.0 / (peak + EPSILON);
        for sample in &mut waveform.samples {
            *sample *= scale;
        }
    }
    waveform
}
