//! HTTP client for the polled feeds.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;

/// A single poll failed. Logged by the poller, never rendered.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed returned status {0}")]
    Status(StatusCode),

    #[error("feed body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Fetches feed bodies as opaque JSON.
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: Client,
    timeout: Duration,
}

impl FeedClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            timeout,
        }
    }

    pub async fn fetch(&self, url: &str) -> Result<Value, PollError> {
        let response = self.client.get(url).timeout(self.timeout).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PollError::Status(status));
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
