//! Streaming audio download with time and size budgets
//!
//! Streams a remote resource chunk-by-chunk into a uniquely named spool
//! file. The whole operation (connect, redirects, body) runs under a single
//! deadline, and the size budget is enforced both from the declared
//! Content-Length and continuously while streaming. The spooled artifact is
//! removed on drop, so no failure or cancellation path can leak it.

use crate::audio::types::AudioReference;
use crate::config::DetectionConfig;
use crate::error::{Error, Result};
use futures::StreamExt;
use reqwest::header;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; voxguard/0.1)";

/// Formats the decoder is known to handle
const SUPPORTED_EXTENSIONS: [&str; 4] = ["mp3", "wav", "m4a", "flac"];

/// Temporary on-disk audio file scoped to one request.
///
/// Created exclusively by [`AudioFetcher::fetch`]; the file is removed
/// exactly once when the value drops, whichever exit path releases it.
#[derive(Debug)]
pub struct TransientAudioFile {
    path: PathBuf,
}

impl TransientAudioFile {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TransientAudioFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("removed spooled audio file {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                "failed to remove spooled audio file {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}

/// Streaming downloader for remote audio resources
pub struct AudioFetcher {
    client: reqwest::Client,
    time_budget: Duration,
    size_budget: u64,
    spool_dir: PathBuf,
}

impl AudioFetcher {
    pub fn new(config: &DetectionConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.spool_dir)?;

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self {
            client,
            time_budget: config.download_timeout,
            size_budget: config.max_download_bytes,
            spool_dir: config.spool_dir.clone(),
        })
    }

    /// Download the referenced audio into a transient spool file.
    ///
    /// The deadline covers the entire operation including redirects; it is
    /// never reset per chunk. On any failure no artifact remains on disk.
    pub async fn fetch(&self, reference: &AudioReference) -> Result<TransientAudioFile> {
        match tokio::time::timeout(self.time_budget, self.fetch_inner(reference)).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(self.time_budget)),
        }
    }

    async fn fetch_inner(&self, reference: &AudioReference) -> Result<TransientAudioFile> {
        debug!(url = %reference.url, "downloading audio");

        let response = self
            .client
            .get(&reference.url)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus(status.as_u16()));
        }

        // Eager size check from the declared length, before reading any body
        if let Some(declared) = response.content_length() {
            if declared > self.size_budget {
                return Err(Error::SizeExceeded {
                    limit: self.size_budget,
                });
            }
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        let extension = infer_extension(&reference.url, &content_type);
        if !SUPPORTED_EXTENSIONS.contains(&extension) {
            warn!(
                extension,
                "unrecognized audio format, passing downstream anyway"
            );
        }

        let path = self
            .spool_dir
            .join(format!("{}.{}", Uuid::new_v4(), extension));

        // The guard owns the spool path from here on: dropping it on any
        // error (or on deadline cancellation) removes the partial file.
        let artifact = TransientAudioFile::new(path);
        let mut file = tokio::fs::File::create(artifact.path()).await?;

        let mut received: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::Network(e.to_string()))?;
            received += chunk.len() as u64;
            if received > self.size_budget {
                return Err(Error::SizeExceeded {
                    limit: self.size_budget,
                });
            }
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        debug!(
            bytes = received,
            path = %artifact.path().display(),
            "audio download complete"
        );
        Ok(artifact)
    }
}

/// Infer a file extension from the reference suffix, falling back to the
/// declared content type, falling back to mp3.
fn infer_extension(url: &str, content_type: &str) -> &'static str {
    let url_lower = url.to_ascii_lowercase();
    for ext in SUPPORTED_EXTENSIONS {
        // Substring rather than suffix match, so query strings and signed
        // URLs still resolve
        if url_lower.contains(&format!(".{ext}")) {
            return ext;
        }
    }

    if content_type.contains("audio/mpeg") || content_type.contains("audio/mp3") {
        "mp3"
    } else if content_type.contains("audio/wav") || content_type.contains("audio/wave") {
        "wav"
    } else if content_type.contains("audio/x-m4a") || content_type.contains("audio/m4a") {
        "m4a"
    } else if content_type.contains("audio/flac") {
        "flac"
    } else {
        "mp3"
    }
}
