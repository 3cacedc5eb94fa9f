//! HTTP client module
//!
//! Provides the PCO client with rate-limit handling and timeout retries.
//!
//! # Features
//!
//! - **Rate-Limit Guard**: waits out 429 responses using `Retry-After`
//! - **Timeout Retries**: re-sends requests that time out, up to a limit
//! - **Throttle**: optional token bucket using governor
//! - **Transport Seam**: `Transport` trait, reqwest-backed by default

mod client;
mod rate_limit;
mod throttle;
mod transport;

pub use client::PcoClient;
pub use rate_limit::{parse_retry_after, RateLimitGuard, DEFAULT_FALLBACK_WAIT, RETRY_AFTER};
pub use throttle::{RequestThrottle, ThrottleConfig};
pub use transport::{ApiRequest, ApiResponse, QueryParams, ReqwestTransport, Transport};

#[cfg(test)]
pub(crate) mod testing;
