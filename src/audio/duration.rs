//! Duration validation from container metadata
//!
//! Rejects over-long audio before any decode work happens. Only the
//! symphonia probe runs here; no packet is ever decoded, so the check stays
//! cheap relative to the size of the file.

use crate::error::{Error, Result};
use std::path::Path;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

/// Check the artifact's metadata duration against the configured maximum.
///
/// Returns the duration in seconds on success. A container that cannot be
/// probed, or that does not declare its length, is `MetadataUnreadable` —
/// distinct from the policy violation `DurationExceeded`.
pub fn check(path: &Path, max_duration_secs: f64) -> Result<f64> {
    let file = std::fs::File::open(path)
        .map_err(|e| Error::MetadataUnreadable(format!("failed to open artifact: {e}")))?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| Error::MetadataUnreadable(e.to_string()))?;

    let track = probed
        .format
        .default_track()
        .ok_or_else(|| Error::MetadataUnreadable("no audio track found".to_string()))?;

    let params = &track.codec_params;
    let duration = match (params.n_frames, params.sample_rate, params.time_base) {
        (Some(frames), Some(rate), _) if rate > 0 => frames as f64 / rate as f64,
        (Some(frames), _, Some(time_base)) => {
            let time = time_base.calc_time(frames);
            time.seconds as f64 + time.frac
        }
        _ => {
            return Err(Error::MetadataUnreadable(
                "container does not declare its duration".to_string(),
            ))
        }
    };

    debug!(
        duration_secs = duration,
        limit_secs = max_duration_secs,
        "checked metadata duration"
    );

    if duration > max_duration_secs {
        return Err(Error::DurationExceeded {
            actual: duration,
            limit: max_duration_secs,
        });
    }

    Ok(duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_wav(path: &Path, seconds: u32, sample_rate: u32) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for _ in 0..(seconds * sample_rate) {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_duration_within_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.wav");
        write_wav(&path, 2, 8000);

        let duration = check(&path, 30.0).unwrap();
        assert!((duration - 2.0).abs() < 0.1);
    }

    #[test]
    fn test_duration_exceeded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("long.wav");
        write_wav(&path, 45, 8000);

        let err = check(&path, 30.0).unwrap_err();
        match err {
            Error::DurationExceeded { actual, limit } => {
                assert!(actual > 44.0 && actual < 46.0);
                assert_eq!(limit, 30.0);
            }
            other => panic!("expected DurationExceeded, got {other:?}"),
        }
    }

    #[test]
    fn test_unreadable_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.wav");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"this is not a RIFF container").unwrap();

        let err = check(&path, 30.0).unwrap_err();
        assert!(matches!(err, Error::MetadataUnreadable(_)));
    }
}
