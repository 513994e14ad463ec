//! Audio decoding to a mono waveform
//!
//! Two decode paths with one output contract: hound reads WAV samples
//! directly, symphonia performs a full decode for compressed containers
//! (MP3, FLAC, AAC, M4A, Vorbis). Both downmix to mono by arithmetic mean,
//! truncate to the maximum duration at the file's native rate, and only then
//! resample to the target rate if it differs.

use crate::audio::resample;
use crate::audio::types::Waveform;
use crate::error::{Error, Result};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

/// Decode the artifact into a mono waveform at `target_rate`, truncated to
/// at most `max_duration_secs` of audio.
pub fn decode(path: &Path, target_rate: u32, max_duration_secs: f64) -> Result<Waveform> {
    let is_wav = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("wav"))
        .unwrap_or(false);

    let (mono, native_rate) = if is_wav {
        decode_wav(path, max_duration_secs)?
    } else {
        decode_compressed(path, max_duration_secs)?
    };

    if mono.is_empty() {
        return Err(Error::EmptyAudio);
    }

    let samples = if native_rate != target_rate {
        resample::resample_mono(&mono, native_rate, target_rate)?
    } else {
        mono
    };

    debug!(
        samples = samples.len(),
        sample_rate = target_rate,
        duration_secs = samples.len() as f64 / target_rate as f64,
        "decoded audio to mono waveform"
    );

    Ok(Waveform::new(samples, target_rate, 1))
}

fn frame_budget(max_duration_secs: f64, sample_rate: u32) -> usize {
    (max_duration_secs * sample_rate as f64) as usize
}

/// Fast path: read WAV samples directly without a codec.
fn decode_wav(path: &Path, max_duration_secs: f64) -> Result<(Vec<f32>, u32)> {
    let mut reader = hound::WavReader::open(path)
        .map_err(|e| Error::Decode(format!("failed to open WAV: {e}")))?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;
    let max_frames = frame_budget(max_duration_secs, spec.sample_rate);

    let mut mono = Vec::new();
    let mut frame = Vec::with_capacity(channels);

    match spec.sample_format {
        hound::SampleFormat::Float => {
            for sample in reader.samples::<f32>() {
                let sample = sample.map_err(|e| Error::Decode(format!("WAV read: {e}")))?;
                frame.push(sample);
                if frame.len() == channels {
                    mono.push(frame.iter().sum::<f32>() / channels as f32);
                    frame.clear();
                    if mono.len() >= max_frames {
                        break;
                    }
                }
            }
        }
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            for sample in reader.samples::<i32>() {
                let sample = sample.map_err(|e| Error::Decode(format!("WAV read: {e}")))?;
                frame.push(sample as f32 / scale);
                if frame.len() == channels {
                    mono.push(frame.iter().sum::<f32>() / channels as f32);
                    frame.clear();
                    if mono.len() >= max_frames {
                        break;
                    }
                }
            }
        }
    }

    Ok((mono, spec.sample_rate))
}

/// General path: full symphonia decode for compressed containers.
fn decode_compressed(path: &Path, max_duration_secs: f64) -> Result<(Vec<f32>, u32)> {
    let file = std::fs::File::open(path)
        .map_err(|e| Error::Decode(format!("failed to open artifact: {e}")))?;

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
        .map_err(|e| Error::Decode(format!("failed to probe format: {e}")))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| Error::Decode("no audio track found".to_string()))?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let native_rate = codec_params
        .sample_rate
        .ok_or_else(|| Error::Decode("sample rate not declared".to_string()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| Error::Decode(format!("failed to create decoder: {e}")))?;

    let max_frames = frame_budget(max_duration_secs, native_rate);
    let mut mono: Vec<f32> = Vec::new();

    loop {
        if mono.len() >= max_frames {
            break;
        }

        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(Error::Decode(format!("failed to read packet: {e}"))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(symphonia::core::errors::Error::DecodeError(e)) => {
                warn!(error = %e, "skipping corrupt audio frame");
                continue;
            }
            Err(e) => return Err(Error::Decode(format!("decode failed: {e}"))),
        };

        let spec = *decoded.spec();
        let frames = decoded.frames();
        if frames == 0 {
            continue;
        }

        let channels = spec.channels.count().max(1);
        let mut sample_buf = SampleBuffer::<f32>::new(frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);

        for frame in sample_buf.samples().chunks(channels) {
            mono.push(frame.iter().sum::<f32>() / channels as f32);
            if mono.len() >= max_frames {
                break;
            }
        }
    }

    mono.truncate(max_frames);
    Ok((mono, native_rate))
}
