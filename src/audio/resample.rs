//! Mono resampling using rubato
//!
//! Single-shot conversion of a whole mono buffer to the target sample rate.

use crate::error::{Error, Result};
use rubato::{FastFixedIn, PolynomialDegree, Resampler};
use tracing::debug;

/// Resample a mono buffer from `from_rate` to `to_rate`.
///
/// Returns a copy when the rates already match.
pub fn resample_mono(input: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if input.is_empty() || from_rate == to_rate {
        return Ok(input.to_vec());
    }

    let mut resampler = FastFixedIn::<f32>::new(
        to_rate as f64 / from_rate as f64,
        1.0,
        PolynomialDegree::Septic,
        input.len(),
        1,
    )
    .map_err(|e| Error::Decode(format!("failed to create resampler: {e}")))?;

    let output = resampler
        .process(&[input.to_vec()], None)
        .map_err(|e| Error::Decode(format!("resampling failed: {e}")))?;

    let samples = output.into_iter().next().unwrap_or_default();

    debug!(
        input_frames = input.len(),
        output_frames = samples.len(),
        from_rate,
        to_rate,
        "resampled mono audio"
    );

    Ok(samples)
}
