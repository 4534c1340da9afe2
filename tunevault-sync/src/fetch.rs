//! Remote audio resource download
//!
//! The `AudioFetcher` capability retrieves the full byte sequence of a
//! source locator. The core imposes no timeout; a fetch either completes,
//! or fails and is reported back through the save pipeline.

use crate::progress::ProgressSink;
use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

/// Fetch errors
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level failure (DNS, connect, mid-body disconnect)
    #[error("Network error: {0}")]
    Network(String),

    /// Remote answered with a non-success status
    #[error("HTTP status {0}")]
    Status(u16),
}

/// Capability to retrieve a binary resource by source locator
#[async_trait]
pub trait AudioFetcher: Send + Sync {
    /// Download the complete resource, reporting advisory progress
    async fn fetch(
        &self,
        locator: &str,
        progress: &dyn ProgressSink,
    ) -> Result<Vec<u8>, FetchError>;
}

/// HTTP fetcher backed by reqwest
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioFetcher for HttpFetcher {
    async fn fetch(
        &self,
        locator: &str,
        progress: &dyn ProgressSink,
    ) -> Result<Vec<u8>, FetchError> {
        let mut response = self
            .client
            .get(locator)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let total = response.content_length();
        let mut body: Vec<u8> = Vec::with_capacity(total.unwrap_or(0) as usize);
        let mut last_percent = 0u8;

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?
        {
            body.extend_from_slice(&chunk);

            if let Some(total) = total.filter(|&t| t > 0) {
                let percent = ((body.len() as u64 * 100) / total).min(100) as u8;
                if percent != last_percent {
                    last_percent = percent;
                    debug!(locator = %locator, "{} percent downloaded", percent);
                    progress.percent(percent);
                }
            }
        }

        if total.is_none() {
            progress.percent(100);
        }

        Ok(body)
    }
}
