//! Voice detection endpoint

use crate::api::AppState;
use crate::audio::types::AudioReference;
use crate::error::{Error, ErrorKind};
use crate::inference::Label;
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

#[derive(Debug, Deserialize)]
pub struct DetectRequest {
    /// URL of the audio file to analyze
    pub audio_url: String,
    /// Optional language code (e.g. "en", "es")
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DetectResponse {
    pub prediction: Label,
    pub confidence: f32,
    pub language: String,
    pub model_version: String,
    pub processing_time_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// `POST /api/v1/detect`
pub async fn detect_voice(
    State(state): State<AppState>,
    Json(request): Json<DetectRequest>,
) -> Result<Json<DetectResponse>, (StatusCode, Json<ErrorBody>)> {
    info!(url = %request.audio_url, "received detection request");

    let reference = AudioReference {
        url: request.audio_url,
        language: request.language,
    };

    match state.pipeline.detect(&reference).await {
        Ok(result) => Ok(Json(DetectResponse {
            prediction: result.label,
            confidence: result.confidence,
            language: reference
                .language
                .unwrap_or_else(|| "unknown".to_string()),
            model_version: result.model_version,
            processing_time_ms: result.processing_time.as_millis() as u64,
        })),
        Err(err) => {
            error!(error = %err, "detection failed");
            Err((
                status_for(&err),
                Json(ErrorBody {
                    error: err.to_string(),
                }),
            ))
        }
    }
}

fn status_for(err: &Error) -> StatusCode {
    match err.kind() {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Transient => StatusCode::BAD_GATEWAY,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&Error::EmptyAudio), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(&Error::HttpStatus(404)),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&Error::Decode("bad frame".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_request_language_is_optional() {
        let request: DetectRequest =
            serde_json::from_str(r#"{"audio_url": "http://x.test/a.wav"}"#).unwrap();
        assert!(request.language.is_none());

        let request: DetectRequest =
            serde_json::from_str(r#"{"audio_url": "http://x.test/a.wav", "language": "en"}"#)
                .unwrap();
        assert_eq!(request.language.as_deref(), Some("en"));
    }
}
