//! Detection pipeline configuration
//!
//! All operative limits are supplied here as immutable per-process
//! configuration. The pipeline never reads the process environment; the
//! binary's argument parser is the only place environment variables are
//! resolved.

use std::path::PathBuf;
use std::time::Duration;

/// Immutable configuration for the detection pipeline
#[derive(Debug, Clone)]
pub struct DetectionConfig {
    /// Deadline for the entire fetch operation, redirects included
    pub download_timeout: Duration,
    /// Maximum bytes accepted from the remote resource
    pub max_download_bytes: u64,
    /// Maximum audio duration accepted, and the decode truncation point
    pub max_duration_secs: f64,
    /// Sample rate every waveform is converted to
    pub target_sample_rate: u32,
    /// Version string reported in detection results
    pub model_version: String,
    /// Optional path to an ONNX classifier; absent means heuristic fallback
    pub model_path: Option<PathBuf>,
    /// Directory transient audio artifacts are spooled into
    pub spool_dir: PathBuf,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            download_timeout: Duration::from_secs(10),
            max_download_bytes: 10 * 1024 * 1024,
            max_duration_secs: 30.0,
            target_sample_rate: 16_000,
            model_version: "1.0.0".to_string(),
            model_path: None,
            spool_dir: std::env::temp_dir().join("voxguard"),
        }
    }
}
