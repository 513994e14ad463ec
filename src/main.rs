//! voxguard - AI voice detection service entry point

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use voxguard::api::{self, AppState};
use voxguard::config::DetectionConfig;
use voxguard::inference::select_backend;
use voxguard::pipeline::DetectionPipeline;

/// Command-line arguments for voxguard
#[derive(Parser, Debug)]
#[command(name = "voxguard")]
#[command(about = "AI-generated voice detection service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8000", env = "VOXGUARD_PORT")]
    port: u16,

    /// Bearer token required on detection requests; omit to disable auth
    #[arg(long, env = "VOXGUARD_API_KEY")]
    api_key: Option<String>,

    /// Path to an ONNX classifier model
    #[arg(long, env = "VOXGUARD_MODEL_PATH")]
    model_path: Option<PathBuf>,

    /// Model version reported in responses
    #[arg(long, default_value = "1.0.0", env = "VOXGUARD_MODEL_VERSION")]
    model_version: String,

    /// Whole-download deadline in seconds
    #[arg(long, default_value = "10", env = "VOXGUARD_DOWNLOAD_TIMEOUT_SECS")]
    download_timeout_secs: u64,

    /// Maximum accepted download size in bytes
    #[arg(long, default_value = "10485760", env = "VOXGUARD_MAX_DOWNLOAD_BYTES")]
    max_download_bytes: u64,

    /// Maximum accepted audio duration in seconds
    #[arg(long, default_value = "30.0", env = "VOXGUARD_MAX_DURATION_SECS")]
    max_duration_secs: f64,

    /// Sample rate waveforms are converted to
    #[arg(long, default_value = "16000", env = "VOXGUARD_TARGET_SAMPLE_RATE")]
    target_sample_rate: u32,

    /// Directory for transient audio spool files
    #[arg(long, env = "VOXGUARD_SPOOL_DIR")]
    spool_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voxguard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = DetectionConfig {
        download_timeout: Duration::from_secs(args.download_timeout_secs),
        max_download_bytes: args.max_download_bytes,
        max_duration_secs: args.max_duration_secs,
        target_sample_rate: args.target_sample_rate,
        model_version: args.model_version,
        model_path: args.model_path,
        spool_dir: args
            .spool_dir
            .unwrap_or_else(|| std::env::temp_dir().join("voxguard")),
    };

    info!("Starting voxguard on port {}", args.port);
    info!("Spool directory: {}", config.spool_dir.display());

    // Backend selection happens exactly once, before serving traffic
    let backend = select_backend(&config);
    info!("Inference backend: {}", backend.name());

    let pipeline = Arc::new(
        DetectionPipeline::new(config, backend).context("Failed to initialize pipeline")?,
    );

    let app_state = AppState {
        pipeline,
        api_key: args.api_key,
    };

    let app = api::create_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
