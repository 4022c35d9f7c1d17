//! Page retrieval.
//!
//! Fetches raw listing markup over HTTP. No retries and no caching: a failure
//! is reported to the caller, which decides whether the run continues.

use crate::config::HttpConfig;
use crate::error::{Result, SalaryError};
use std::time::Duration;
use tracing::debug;

/// Source of raw page markup.
pub trait PageFetcher {
    /// Fetch `url` and return its body text.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// HTTP fetcher sharing one connection pool across pages.
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout_seconds: u64,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            timeout_seconds: config.timeout_seconds,
        })
    }

    fn network_error(&self, url: &str, e: reqwest::Error) -> SalaryError {
        let reason = if e.is_timeout() {
            format!("request timed out after {}s", self.timeout_seconds)
        } else if e.is_connect() {
            "cannot connect to host".to_string()
        } else {
            e.to_string()
        };

        SalaryError::Network {
            url: url.to_string(),
            reason,
        }
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.network_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SalaryError::Network {
                url: url.to_string(),
                reason: format!("HTTP {}", status),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.network_error(url, e))?;

        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}
