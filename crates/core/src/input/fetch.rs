//! HTTP fetcher for URL-referenced inputs.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::transcoder::TranscodeError;

/// Configuration for the remote input fetcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Timeout for a single download in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum accepted download size in bytes.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,

    /// User-Agent sent with download requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout() -> u64 {
    30
}

fn default_max_bytes() -> u64 {
    100 * 1024 * 1024
}

fn default_user_agent() -> String {
    format!("Forgeline/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            max_bytes: default_max_bytes(),
            user_agent: default_user_agent(),
        }
    }
}

/// Downloads URL-referenced inputs into memory.
pub struct Fetcher {
    client: Client,
    max_bytes: u64,
}

impl Fetcher {
    /// Creates a new fetcher.
    pub fn new(config: FetcherConfig) -> Result<Self, TranscodeError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TranscodeError::FetchFailed {
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            max_bytes: config.max_bytes,
        })
    }

    /// Downloads the resource at `url` and returns its bytes.
    ///
    /// Non-success statuses and oversized bodies are acquisition failures.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, TranscodeError> {
        debug!(url, "fetching remote input");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TranscodeError::FetchFailed {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranscodeError::FetchFailed {
                reason: format!("unexpected status {} from {}", status, url),
            });
        }

        if let Some(length) = response.content_length() {
            if length > self.max_bytes {
                return Err(TranscodeError::FetchFailed {
                    reason: format!("remote input of {} bytes exceeds limit", length),
                });
            }
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TranscodeError::FetchFailed {
                reason: e.to_string(),
            })?;

        if bytes.len() as u64 > self.max_bytes {
            return Err(TranscodeError::FetchFailed {
                reason: format!("remote input of {} bytes exceeds limit", bytes.len()),
            });
        }

        debug!(url, bytes = bytes.len(), "remote input fetched");
        Ok(bytes.to_vec())
    }
}
