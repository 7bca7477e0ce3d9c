//! Page fetching.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;

use crate::config::FetchConfig;
use crate::error::{EscribaError, Result};

/// Source of raw page markup.
///
/// `Ok(None)` means the page answered but has no usable content (any
/// non-2xx status). Errors are transport failures.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Option<String>>;
}

/// [`PageSource`] performing a single HTTP GET per call.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Create a fetcher with the configured timeout and user agent.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| EscribaError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(HttpFetcher { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl PageSource for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Option<String>> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| EscribaError::fetch(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            warn!("GET {} returned status {}", url, status);
            return Ok(None);
        }

        let body = response
            .text()
            .await
            .map_err(|e| EscribaError::fetch(format!("Failed to read body of {}: {}", url, e)))?;
        debug!("GET {} returned {} bytes", url, body.len());
        Ok(Some(body))
    }
}
