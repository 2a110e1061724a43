//! Downloads a single remote file with retries and size verification.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use futures::StreamExt;
use log::{error, info, warn};
use rand::Rng;
use reqwest::{Client, StatusCode};

use crate::config::DownloadConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// What happened to one file.
pub enum DownloadOutcome {
    /// Downloaded and, if requested, size-verified.
    Success,
    /// Local copy already present and acceptable.
    Skipped,
    /// The remote file does not exist. Not retried.
    NotFound,
    /// Transport or local IO failure that survived every retry.
    TransferFailed,
    /// Downloaded bytes never matched the remote size.
    SizeMismatch,
}

impl DownloadOutcome {
    /// True when the local file is present and trusted after the call.
    pub fn is_ok(self) -> bool {
        matches!(self, DownloadOutcome::Success | DownloadOutcome::Skipped)
    }
}

enum StreamError {
    NotFound,
    Transport(String),
}

/// Sequential HTTP fetcher. One request in flight at a time.
pub struct Fetcher {
    client: Client,
    config: DownloadConfig,
}

impl Fetcher {
    pub fn new(config: DownloadConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &DownloadConfig {
        &self.config
    }

    /// Remote file size via a metadata-only HEAD request.
    ///
    /// `None` means the size could not be determined: the file is absent
    /// upstream, the server answered with an error, or the request failed.
    pub async fn remote_size(&self, url: &str) -> Option<u64> {
        match self.client.head(url).send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    let size = response
                        .headers()
                        .get(reqwest::header::CONTENT_LENGTH)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.parse::<u64>().ok())
                        .unwrap_or(0);
                    Some(size)
                } else if status == StatusCode::NOT_FOUND {
                    warn!("File not found on server: {url}");
                    None
                } else {
                    warn!("Failed to get size of {url}: status {status}");
                    None
                }
            }
            Err(e) => {
                error!("Error checking size of {url}: {e}");
                None
            }
        }
    }

    /// Whether the local copy can stand in for a fresh download.
    ///
    /// A missing local file is never valid. When the remote size cannot be
    /// determined the file is assumed valid, so a transient metadata
    /// failure does not trigger a re-download.
    pub async fn is_valid(&self, url: &str, local_path: &Path) -> bool {
        if !local_path.exists() {
            return false;
        }

        let Some(remote_size) = self.remote_size(url).await else {
            return true;
        };

        let local_size = match fs::metadata(local_path) {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                error!("Failed to stat {}: {e}", local_path.display());
                return false;
            }
        };

        if remote_size != local_size {
            warn!(
                "Size mismatch for {}. Remote: {remote_size}, local: {local_size}",
                local_path.display()
            );
            return false;
        }

        true
    }

    /// Downloads `url` to `local_path` with up to `max_retries` attempts.
    ///
    /// An existing file is kept when it passes the size check (or, with
    /// `check_size` off, merely because it exists); an existing file with
    /// the wrong size is deleted and downloaded again. A 404 is terminal
    /// on the first attempt. Transport faults and post-download size
    /// mismatches each consume one attempt.
    pub async fn fetch(
        &self,
        url: &str,
        local_path: &Path,
        max_retries: u32,
        check_size: bool,
    ) -> DownloadOutcome {
        if let Some(parent) = local_path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create directory {}: {e}", parent.display());
                return DownloadOutcome::TransferFailed;
            }
        }

        if local_path.exists() {
            if !check_size {
                info!("File {} already present, skipping", local_path.display());
                return DownloadOutcome::Skipped;
            }
            if self.is_valid(url, local_path).await {
                info!(
                    "File {} already present with valid size, skipping",
                    local_path.display()
                );
                return DownloadOutcome::Skipped;
            }
            warn!(
                "File {} has the wrong size, deleting and re-downloading",
                local_path.display()
            );
            if let Err(e) = fs::remove_file(local_path) {
                error!("Failed to delete {}: {e}", local_path.display());
                return DownloadOutcome::TransferFailed;
            }
        }

        let mut attempts = 0;
        while attempts < max_retries {
            match self.stream_to_file(url, local_path).await {
                Err(StreamError::NotFound) => {
                    warn!("File not found: {url}");
                    return DownloadOutcome::NotFound;
                }
                Err(StreamError::Transport(message)) => {
                    attempts += 1;
                    if attempts < max_retries {
                        warn!("Attempt {attempts} failed for {url}: {message}. Retrying...");
                        self.sleep_band(self.config.backoff_ms).await;
                    } else {
                        error!("Failed to download {url} after {max_retries} attempts: {message}");
                        return DownloadOutcome::TransferFailed;
                    }
                }
                Ok(()) => {
                    if check_size && !self.is_valid(url, local_path).await {
                        warn!(
                            "Size verification failed after download: {}",
                            local_path.display()
                        );
                        attempts += 1;
                        if attempts < max_retries {
                            continue;
                        }
                        return DownloadOutcome::SizeMismatch;
                    }

                    // Throttle before returning to bound the request rate.
                    self.sleep_band(self.config.throttle_ms).await;
                    info!("Downloaded {url} to {}", local_path.display());
                    return DownloadOutcome::Success;
                }
            }
        }

        DownloadOutcome::TransferFailed
    }

    /// Streams the response body to disk chunk by chunk.
    async fn stream_to_file(&self, url: &str, local_path: &Path) -> Result<(), StreamError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| StreamError::Transport(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(StreamError::NotFound);
        }
        if !response.status().is_success() {
            return Err(StreamError::Transport(format!(
                "status {}",
                response.status()
            )));
        }

        let mut file =
            File::create(local_path).map_err(|e| StreamError::Transport(e.to_string()))?;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| StreamError::Transport(e.to_string()))?;
            file.write_all(&chunk)
                .map_err(|e| StreamError::Transport(e.to_string()))?;
        }

        Ok(())
    }

    /// Sleeps a uniform random duration drawn from `(min, max)` milliseconds.
    async fn sleep_band(&self, band: (u64, u64)) {
        let (min, max) = band;
        if max == 0 {
            return;
        }
        let millis = rand::thread_rng().gen_range(min..=max);
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }
}

// -- Tests -------------------------------------------------------------------
