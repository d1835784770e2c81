// src/services/fetch.rs

//! Document fetching.
//!
//! The driver only sees [`PageFetcher`], so tests can substitute a stub that
//! serves canned page sources.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::CrawlerConfig;
use crate::error::{AppError, Result};

/// Fetches the raw page source for a URL.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Retrieve the page source. A failure here is per-call; the fetcher
    /// itself stays usable.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// HTTP implementation backed by a configured reqwest client.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher with the configured user agent and timeout.
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::fetch(url, e))?;
        let response = response
            .error_for_status()
            .map_err(|e| AppError::fetch(url, e))?;
        response.text().await.map_err(|e| AppError::fetch(url, e))
    }
}
