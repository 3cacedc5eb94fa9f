//! Rate-limit handling
//!
//! PCO answers 429 with a `Retry-After` header in whole seconds. The guard
//! sleeps for that long and re-runs the same attempt, with no retry bound:
//! PCO rate limits are always transient.

use super::transport::ApiResponse;
use crate::error::Result;
use reqwest::StatusCode;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Header carrying the wait, in whole seconds
pub const RETRY_AFTER: &str = "retry-after";

/// Wait used when a 429 arrives without a usable Retry-After header
pub const DEFAULT_FALLBACK_WAIT: Duration = Duration::from_secs(1);

/// Retries an attempt for as long as it is rate limited
#[derive(Debug, Clone, Copy)]
pub struct RateLimitGuard {
    fallback_wait: Duration,
}

impl RateLimitGuard {
    /// Create a guard that waits `fallback_wait` when Retry-After is unusable
    pub fn new(fallback_wait: Duration) -> Self {
        Self { fallback_wait }
    }

    /// The wait used when Retry-After is missing or unparsable
    pub fn fallback_wait(&self) -> Duration {
        self.fallback_wait
    }

    /// How long to wait before retrying a rate-limited response
    pub fn wait_for(&self, response: &ApiResponse) -> Duration {
        response
            .header(RETRY_AFTER)
            .and_then(parse_retry_after)
            .unwrap_or(self.fallback_wait)
    }

    /// Run `attempt` until it returns something other than 429.
    ///
    /// Errors from `attempt` are returned immediately.
    pub async fn run<F, Fut>(&self, mut attempt: F) -> Result<ApiResponse>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<ApiResponse>>,
    {
        let mut limited = 0u32;

        loop {
            let response = attempt().await?;

            if response.status != StatusCode::TOO_MANY_REQUESTS {
                return Ok(response);
            }

            limited += 1;
            let wait = self.wait_for(&response);
            warn!(
                "Received rate limit response ({limited} so far), retrying in {:?}",
                wait
            );
            tokio::time::sleep(wait).await;
        }
    }
}

impl Default for RateLimitGuard {
    fn default() -> Self {
        Self::new(DEFAULT_FALLBACK_WAIT)
    }
}

/// Parse a Retry-After value given in whole seconds
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}
