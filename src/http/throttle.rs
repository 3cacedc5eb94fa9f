//! Client-side request throttle
//!
//! Uses the governor crate for token bucket rate limiting. Off by default;
//! when enabled it spaces requests so the server rarely has to answer 429.

use crate::config::duration_secs;
use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for the request throttle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrottleConfig {
    /// Requests allowed per period (also the burst size)
    pub max_requests: u32,
    /// Length of the period
    #[serde(rename = "period_secs", with = "duration_secs")]
    pub period: Duration,
}

impl Default for ThrottleConfig {
    /// PCO's published limit: 100 requests per 20 seconds
    fn default() -> Self {
        Self {
            max_requests: 100,
            period: Duration::from_secs(20),
        }
    }
}

impl ThrottleConfig {
    /// Create a new throttle config
    pub fn new(max_requests: u32, period: Duration) -> Self {
        Self {
            max_requests,
            period,
        }
    }
}

/// Token bucket throttle shared by clones
#[derive(Clone)]
pub struct RequestThrottle {
    limiter: Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
}

impl RequestThrottle {
    /// Create a throttle from config; zero values are clamped to one
    pub fn new(config: &ThrottleConfig) -> Self {
        let burst = NonZeroU32::new(config.max_requests).unwrap_or(NonZeroU32::MIN);
        let replenish = (config.period / burst.get()).max(Duration::from_nanos(1));
        let quota = Quota::with_period(replenish)
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst);

        Self {
            limiter: Arc::new(Governor::direct(quota)),
        }
    }

    /// Wait until a request can be made
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }

    /// Try to acquire a permit, returning immediately
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl std::fmt::Debug for RequestThrottle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestThrottle").finish()
    }
}

#[cfg(test)]
mod throttle_tests {
    use super::*;

    #[test]
    fn test_throttle_config_default() {
        let config = ThrottleConfig::default();
        assert_eq!(config.max_requests, 100);
        assert_eq!(config.period, Duration::from_secs(20));
    }

    #[test]
    fn test_throttle_allows_burst_then_blocks() {
        let throttle = RequestThrottle::new(&ThrottleConfig::new(5, Duration::from_secs(60)));

        for _ in 0..5 {
            assert!(throttle.try_acquire());
        }
        assert!(!throttle.try_acquire());
    }

    #[test]
    fn test_throttle_clamps_zero_requests() {
        let throttle = RequestThrottle::new(&ThrottleConfig::new(0, Duration::from_secs(60)));
        assert!(throttle.try_acquire());
        assert!(!throttle.try_acquire());
    }

    #[tokio::test]
    async fn test_throttle_wait_within_burst() {
        let throttle = RequestThrottle::new(&ThrottleConfig::new(100, Duration::from_secs(1)));

        // Within burst, completes without blocking
        throttle.wait().await;
        throttle.wait().await;
    }

    #[test]
    fn test_clones_share_the_bucket() {
        let throttle = RequestThrottle::new(&ThrottleConfig::new(1, Duration::from_secs(60)));
        let clone = throttle.clone();

        assert!(throttle.try_acquire());
        assert!(!clone.try_acquire());
    }
}
