//! Bounded retries around the page fetcher
//!
//! Every attempt is preceded by a randomized polite delay drawn from the
//! policy's `[min_delay, max_delay]` window. A failed attempt is followed by
//! the fixed backoff delay when attempts remain. After `max_attempts` real
//! attempts the controller hands a `RetryError` back to its caller, which
//! decides how the failure is accounted for.

use crate::config::RetryPolicy;
use crate::crawler::fetcher::{FetchError, PageFetcher};
use rand::Rng;
use std::time::Duration;
use thiserror::Error;

/// Why one attempt did not produce a usable result
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Extraction failed: {0}")]
    Extraction(String),
}

/// Terminal failure after the retry budget was spent
#[derive(Debug, Error)]
#[error("Giving up on {url} after {attempts} attempts: {last_error}")]
pub struct RetryError {
    pub url: String,
    pub attempts: u32,
    pub last_error: AttemptError,
}

/// Applies a `RetryPolicy` to fetches made through a `PageFetcher`
pub struct RetryController<'a> {
    fetcher: &'a dyn PageFetcher,
    policy: RetryPolicy,
    label: &'static str,
}

impl<'a> RetryController<'a> {
    /// Creates a controller
    ///
    /// `label` names the fetch class ("listing", "detail") in log lines.
    pub fn new(fetcher: &'a dyn PageFetcher, policy: RetryPolicy, label: &'static str) -> Self {
        Self {
            fetcher,
            policy,
            label,
        }
    }

    /// Fetches a page, retrying transport failures and empty bodies
    pub async fn fetch(&self, url: &str) -> Result<String, RetryError> {
        self.fetch_with(url, Ok).await
    }

    /// Fetches a page and validates it with `accept`
    ///
    /// An `Err` from `accept` consumes an attempt exactly like a failed
    /// fetch, so pages missing mandatory content are re-requested within the
    /// same budget.
    pub async fn fetch_with<T, F>(&self, url: &str, mut accept: F) -> Result<T, RetryError>
    where
        F: FnMut(String) -> Result<T, AttemptError>,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            pause(polite_delay(&self.policy)).await;

            tracing::debug!(
                "{} fetch {} (attempt {}/{})",
                self.label,
                url,
                attempt,
                max_attempts
            );

            let result = match self.fetcher.fetch(url).await {
                Ok(body) => accept(body),
                Err(e) => Err(AttemptError::from(e)),
            };

            match result {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= max_attempts => {
                    tracing::warn!(
                        "{} attempt {}/{} failed for {}: {}",
                        self.label,
                        attempt,
                        max_attempts,
                        url,
                        e
                    );
                    return Err(RetryError {
                        url: url.to_string(),
                        attempts: attempt,
                        last_error: e,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        "{} attempt {}/{} failed for {}: {} (retrying in {:?})",
                        self.label,
                        attempt,
                        max_attempts,
                        url,
                        e,
                        self.policy.backoff_delay
                    );
                    pause(self.policy.backoff_delay).await;
                }
            }
        }
    }
}

/// Draws the polite delay preceding a fetch
///
/// Uniform over `[min_delay, max_delay]`; a degenerate window yields
/// `min_delay`.
pub fn polite_delay(policy: &RetryPolicy) -> Duration {
    if policy.max_delay <= policy.min_delay {
        return policy.min_delay;
    }

    let secs = rand::rng()
        .random_range(policy.min_delay.as_secs_f64()..=policy.max_delay.as_secs_f64());
    Duration::from_secs_f64(secs)
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
