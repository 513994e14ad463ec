//! End-to-end pipeline tests
//!
//! Serves audio fixtures from a local HTTP server and drives the full
//! fetch → validate → decode → normalize → predict sequence, asserting the
//! cleanup guarantee (no spool file survives any outcome).

use axum::body::{Body, Bytes};
use axum::routing::get;
use axum::Router;
use futures::stream;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use voxguard::audio::types::AudioReference;
use voxguard::audio::{decode, normalize, AudioFetcher};
use voxguard::config::DetectionConfig;
use voxguard::inference::{FallbackBackend, Label};
use voxguard::pipeline::DetectionPipeline;
use voxguard::Error;

/// Render a 440 Hz sine WAV into memory
fn wav_bytes(seconds: f64, sample_rate: u32, channels: u16, amplitude: f32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        let frames = (seconds * sample_rate as f64) as usize;
        for i in 0..frames {
            let t = i as f32 / sample_rate as f32;
            let sample = (2.0 * std::f32::consts::PI * 440.0 * t).sin() * amplitude;
            let quantized = (sample * i16::MAX as f32) as i16;
            for _ in 0..channels {
                writer.write_sample(quantized).unwrap();
            }
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

/// Spawn a local server with the audio fixtures used below
async fn spawn_fixture_server() -> SocketAddr {
    let app = Router::new()
        .route("/clip.wav", get(|| async { wav_bytes(5.0, 44_100, 2, 0.5) }))
        .route("/long.wav", get(|| async { wav_bytes(45.0, 8_000, 1, 0.5) }))
        // 15 MB chunked body with no Content-Length, to exercise the
        // mid-transfer size check rather than the eager header check
        .route(
            "/big.bin",
            get(|| async {
                let chunk = vec![0u8; 1024 * 1024];
                let chunks = (0..15).map(move |_| Ok::<_, std::io::Error>(Bytes::from(chunk.clone())));
                Body::from_stream(stream::iter(chunks))
            }),
        )
        // 15 MB body with a declared Content-Length
        .route(
            "/big-declared.bin",
            get(|| async { vec![0u8; 15 * 1024 * 1024] }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Vec::new()
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn test_config(spool_dir: &std::path::Path) -> DetectionConfig {
    DetectionConfig {
        spool_dir: spool_dir.to_path_buf(),
        ..DetectionConfig::default()
    }
}

fn test_pipeline(config: DetectionConfig) -> DetectionPipeline {
    let backend = Arc::new(FallbackBackend::new(config.model_version.clone()));
    DetectionPipeline::new(config, backend).unwrap()
}

fn spool_file_count(spool_dir: &std::path::Path) -> usize {
    std::fs::read_dir(spool_dir).unwrap().count()
}

#[tokio::test]
async fn detects_five_second_clip() {
    let addr = spawn_fixture_server().await;
    let spool = tempfile::tempdir().unwrap();
    let pipeline = test_pipeline(test_config(spool.path()));

    let reference = AudioReference::new(format!("http://{addr}/clip.wav"));
    let result = pipeline.detect(&reference).await.unwrap();

    // 5 seconds lands in the heuristic's middle band
    assert_eq!(result.label, Label::Human);
    assert_eq!(result.confidence, 0.65);
    assert_eq!(result.model_version, "1.0.0");

    // Artifact cleaned up on success
    assert_eq!(spool_file_count(spool.path()), 0);
}

#[tokio::test]
async fn decodes_to_target_rate_with_normalized_peak() {
    let addr = spawn_fixture_server().await;
    let spool = tempfile::tempdir().unwrap();
    let config = test_config(spool.path());
    let fetcher = AudioFetcher::new(&config).unwrap();

    let reference = AudioReference::new(format!("http://{addr}/clip.wav"));
    let artifact = fetcher.fetch(&reference).await.unwrap();

    let waveform = decode::decode(artifact.path(), 16_000, 30.0).unwrap();
    let waveform = normalize::normalize(waveform);

    assert_eq!(waveform.sample_rate, 16_000);
    assert_eq!(waveform.channels, 1);

    // 5 s stereo 44.1 kHz source → ~80,000 mono samples at 16 kHz
    let expected = 80_000;
    let tolerance = expected / 100;
    assert!(
        waveform.len() >= expected - tolerance && waveform.len() <= expected + tolerance,
        "expected ~{} samples, got {}",
        expected,
        waveform.len()
    );

    let peak = waveform.peak();
    assert!(
        (0.99..=1.0).contains(&peak),
        "normalized peak out of range: {peak}"
    );
}

#[tokio::test]
async fn rejects_overlong_audio_before_decode() {
    let addr = spawn_fixture_server().await;
    let spool = tempfile::tempdir().unwrap();
    let pipeline = test_pipeline(test_config(spool.path()));

    let reference = AudioReference::new(format!("http://{addr}/long.wav"));
    let err = pipeline.detect(&reference).await.unwrap_err();

    match err {
        Error::DurationExceeded { actual, limit } => {
            assert!(actual > 44.0);
            assert_eq!(limit, 30.0);
        }
        other => panic!("expected DurationExceeded, got {other:?}"),
    }
    assert_eq!(spool_file_count(spool.path()), 0);
}

#[tokio::test]
async fn maps_upstream_404() {
    let addr = spawn_fixture_server().await;
    let spool = tempfile::tempdir().unwrap();
    let pipeline = test_pipeline(test_config(spool.path()));

    let reference = AudioReference::new(format!("http://{addr}/missing.wav"));
    let err = pipeline.detect(&reference).await.unwrap_err();

    assert!(matches!(err, Error::HttpStatus(404)));
    assert_eq!(spool_file_count(spool.path()), 0);
}

#[tokio::test]
async fn aborts_oversized_stream_mid_transfer() {
    let addr = spawn_fixture_server().await;
    let spool = tempfile::tempdir().unwrap();
    let pipeline = test_pipeline(test_config(spool.path()));

    let reference = AudioReference::new(format!("http://{addr}/big.bin"));
    let err = pipeline.detect(&reference).await.unwrap_err();

    assert!(matches!(err, Error::SizeExceeded { .. }));
    assert_eq!(spool_file_count(spool.path()), 0);
}

#[tokio::test]
async fn rejects_oversized_declared_length_eagerly() {
    let addr = spawn_fixture_server().await;
    let spool = tempfile::tempdir().unwrap();
    let pipeline = test_pipeline(test_config(spool.path()));

    let reference = AudioReference::new(format!("http://{addr}/big-declared.bin"));
    let err = pipeline.detect(&reference).await.unwrap_err();

    assert!(matches!(err, Error::SizeExceeded { .. }));
    assert_eq!(spool_file_count(spool.path()), 0);
}

#[tokio::test]
async fn times_out_slow_upstream() {
    let addr = spawn_fixture_server().await;
    let spool = tempfile::tempdir().unwrap();
    let config = DetectionConfig {
        download_timeout: Duration::from_millis(500),
        spool_dir: spool.path().to_path_buf(),
        ..DetectionConfig::default()
    };
    let pipeline = test_pipeline(config);

    let reference = AudioReference::new(format!("http://{addr}/slow"));
    let err = pipeline.detect(&reference).await.unwrap_err();

    assert!(matches!(err, Error::Timeout(_)));
    assert_eq!(spool_file_count(spool.path()), 0);
}

#[tokio::test]
async fn network_failure_is_transient() {
    let spool = tempfile::tempdir().unwrap();
    let pipeline = test_pipeline(test_config(spool.path()));

    // Nothing listens on this port
    let reference = AudioReference::new("http://127.0.0.1:1/clip.wav");
    let err = pipeline.detect(&reference).await.unwrap_err();

    assert!(matches!(err, Error::Network(_)));
    assert_eq!(spool_file_count(spool.path()), 0);
}
