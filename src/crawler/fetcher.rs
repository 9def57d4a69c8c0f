//! Page fetching
//!
//! This module defines the fetching collaborator used by every crawl step and
//! its HTTP implementation:
//! - Building the HTTP client with user agent and timeouts
//! - GET requests returning the page body
//! - Classifying failures (transport, HTTP status, empty body)
//! - Explicit client shutdown

use crate::config::HttpConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::RwLock;
use std::time::Duration;
use thiserror::Error;

/// Why a single fetch attempt failed
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Empty response body from {url}")]
    EmptyBody { url: String },

    #[error("Fetcher already shut down, not requesting {url}")]
    Closed { url: String },
}

/// Source of page content
///
/// The crawler owns one fetcher for the whole run and calls it sequentially.
/// Implementations only report what happened to one request; retrying and
/// pacing are handled by the caller.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches one page and returns its body
    ///
    /// An empty or whitespace-only body is an error.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;

    /// Releases resources held by the fetcher once the run is over
    async fn shutdown(&self) {}
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use sumi_gather::config::HttpConfig;
/// use sumi_gather::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// `PageFetcher` backed by a `reqwest::Client`
///
/// The client is released by `shutdown`; later fetches fail with
/// `FetchError::Closed`.
#[derive(Debug)]
pub struct HttpFetcher {
    client: RwLock<Option<Client>>,
}

impl HttpFetcher {
    /// Creates the fetcher and its connection pool
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config)?;
        tracing::debug!("HTTP client ready (user agent: {})", config.user_agent);
        Ok(Self {
            client: RwLock::new(Some(client)),
        })
    }

    /// Handle to the live client, None after shutdown
    fn client(&self) -> Option<Client> {
        self.client.read().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let client = self.client().ok_or_else(|| FetchError::Closed {
            url: url.to_string(),
        })?;

        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| classify_error(url, e))?;

        if body.trim().is_empty() {
            return Err(FetchError::EmptyBody {
                url: url.to_string(),
            });
        }

        Ok(body)
    }

    async fn shutdown(&self) {
        let released = match self.client.write() {
            Ok(mut guard) => guard.take().is_some(),
            Err(_) => false,
        };

        // Dropping the last client handle closes the pooled connections
        if released {
            tracing::debug!("HTTP fetcher shut down, connection pool released");
        }
    }
}

/// Maps a reqwest error onto a fetch error
fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
