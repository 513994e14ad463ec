//! Error types for voxguard
//!
//! Defines module-specific error types using thiserror for clear error
//! propagation. Every failure the pipeline can produce is one of these
//! variants; [`Error::kind`] groups them into the three classes the calling
//! layer maps onto user-visible behavior.

use std::time::Duration;
use thiserror::Error;

/// Main error type for voxguard
#[derive(Error, Debug)]
pub enum Error {
    /// Whole-operation download deadline expired
    #[error("download timed out after {0:?}")]
    Timeout(Duration),

    /// Upstream returned a non-success status code
    #[error("upstream returned HTTP {0}")]
    HttpStatus(u16),

    /// Declared or streamed size exceeds the download budget
    #[error("audio exceeds size budget of {limit} bytes")]
    SizeExceeded { limit: u64 },

    /// Connection, DNS, or mid-stream transfer failure
    #[error("network error: {0}")]
    Network(String),

    /// Metadata duration exceeds the configured maximum
    #[error("audio duration {actual:.1}s exceeds limit of {limit:.1}s")]
    DurationExceeded { actual: f64, limit: f64 },

    /// Container metadata could not be read or does not declare a duration
    #[error("unreadable audio metadata: {0}")]
    MetadataUnreadable(String),

    /// Decode produced zero samples
    #[error("audio stream decoded to zero samples")]
    EmptyAudio,

    /// Audio decoding errors
    #[error("audio decode error: {0}")]
    Decode(String),

    /// Inference backend errors
    #[error("inference error: {0}")]
    Inference(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure classification for the calling layer.
///
/// `Validation` is caller-fixable input, `Transient` is potentially
/// retryable by the caller, `Internal` is neither. No retries happen inside
/// the pipeline itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Transient,
    Internal,
}

impl Error {
    /// Classify this failure for transport-level mapping
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::SizeExceeded { .. }
            | Error::DurationExceeded { .. }
            | Error::MetadataUnreadable(_)
            | Error::EmptyAudio => ErrorKind::Validation,
            Error::Timeout(_) | Error::HttpStatus(_) | Error::Network(_) => ErrorKind::Transient,
            Error::Decode(_) | Error::Inference(_) | Error::Config(_) | Error::Io(_) => {
                ErrorKind::Internal
            }
        }
    }
}

/// Convenience Result type using voxguard Error
pub type Result<T> = std::result::Result<T, Error>;
