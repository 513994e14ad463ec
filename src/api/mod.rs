//! HTTP surface for the detection service
//!
//! Thin adapter over the detection pipeline: route definitions, bearer-token
//! authentication, and the mapping from pipeline failures to status codes
//! live here and nowhere else.

pub mod detect;

use crate::pipeline::DetectionPipeline;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Detection pipeline
    pub pipeline: Arc<DetectionPipeline>,
    /// Expected bearer token; `None` disables authentication
    pub api_key: Option<String>,
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest(
            "/api/v1",
            Router::new().route("/detect", post(detect::detect_voice)),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint, unauthenticated
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "module": "voxguard",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Bearer-token check applied to everything except the health endpoint
async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if request.uri().path() == "/health" {
        return next.run(request).await;
    }

    let Some(expected) = &state.api_key else {
        return next.run(request).await;
    };

    let provided = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match provided {
        Some(token) if token == expected => next.run(request).await,
        Some(_) => {
            warn!("rejected request with invalid API key");
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "invalid API key"})),
            )
                .into_response()
        }
        None => {
            warn!("rejected request with missing API key");
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "missing API key"})),
            )
                .into_response()
        }
    }
}
