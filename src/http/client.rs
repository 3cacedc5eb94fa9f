//! PCO client
//!
//! Every request goes through the same layers:
//! - URL normalization against `api_base`
//! - Rate-limit guard (sleep on 429, then re-send)
//! - Timeout retry (bounded by `timeout_retries`)
//! - Optional client-side throttle
//! - Status check: non-2xx becomes `Error::Request`

use super::rate_limit::RateLimitGuard;
use super::throttle::RequestThrottle;
use super::transport::{ApiRequest, ApiResponse, QueryParams, ReqwestTransport, Transport};
use crate::auth::Authenticator;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::pagination::{IterateOptions, PageSequencer};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Two or more slashes not preceded by ':' (keeps the scheme separator intact)
static REPEATED_SLASHES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^:])/{2,}").expect("valid slash regex"));

/// Client for the Planning Center Online API
#[derive(Clone)]
pub struct PcoClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    guard: RateLimitGuard,
    throttle: Option<RequestThrottle>,
}

impl PcoClient {
    /// Create a client that talks to PCO over reqwest
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let authenticator = Authenticator::new(config.auth()?);
        let transport = ReqwestTransport::new(authenticator, config.timeout, &config.user_agent)?;
        let client = Self::with_transport(config, Arc::new(transport));
        debug!("PCO client initialized for {}", client.config.api_base);
        Ok(client)
    }

    /// Create a client over a custom transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let guard = RateLimitGuard::new(config.rate_limit_fallback);
        let throttle = config.throttle.as_ref().map(RequestThrottle::new);

        Self {
            config,
            transport,
            guard,
            throttle,
        }
    }

    /// The client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Perform a GET request and decode the JSON body
    pub async fn get(&self, url: &str, query: QueryParams) -> Result<Option<Value>> {
        self.request_json(Method::GET, url, None, query).await
    }

    /// Perform a POST request and decode the JSON body
    pub async fn post(
        &self,
        url: &str,
        payload: Option<Value>,
        query: QueryParams,
    ) -> Result<Option<Value>> {
        self.request_json(Method::POST, url, payload, query).await
    }

    /// Perform a PATCH request and decode the JSON body
    pub async fn patch(
        &self,
        url: &str,
        payload: Option<Value>,
        query: QueryParams,
    ) -> Result<Option<Value>> {
        self.request_json(Method::PATCH, url, payload, query).await
    }

    /// Perform a DELETE request.
    ///
    /// A successful delete has an empty body, so the response itself is returned.
    pub async fn delete(&self, url: &str, query: QueryParams) -> Result<ApiResponse> {
        self.request_response(Method::DELETE, url, None, query)
            .await
    }

    /// Iterate every object of a list endpoint, following `links.next`
    pub fn iterate(&self, url: &str, options: IterateOptions) -> PageSequencer<'_> {
        PageSequencer::new(self, url, options)
    }

    /// Make a managed request and decode the JSON body.
    ///
    /// Returns `None` for 204 responses and empty bodies.
    pub async fn request_json(
        &self,
        method: Method,
        url: &str,
        payload: Option<Value>,
        query: QueryParams,
    ) -> Result<Option<Value>> {
        let response = self.request_response(method, url, payload, query).await?;
        response.json()
    }

    /// Make a managed request and return the raw response
    pub async fn request_response(
        &self,
        method: Method,
        url: &str,
        payload: Option<Value>,
        query: QueryParams,
    ) -> Result<ApiResponse> {
        let mut request = ApiRequest::new(method, self.normalize_url(url)).with_query(query);
        request.body = payload;

        self.send(&request).await
    }

    /// Send a prepared request through the guard and check its status
    pub(crate) async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let response = self
            .guard
            .run(|| self.send_with_timeout_retries(request))
            .await?;

        check_status(request, response)
    }

    /// One logical attempt: re-sends on transport timeouts
    async fn send_with_timeout_retries(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let max_attempts = self.config.timeout_retries.max(1);
        let mut attempt = 0;

        loop {
            if let Some(ref throttle) = self.throttle {
                throttle.wait().await;
            }

            attempt += 1;
            match self.transport.send(request).await {
                Err(Error::Timeout { .. }) => {
                    warn!(
                        "The request to '{}' timed out after {} tries",
                        request.url, attempt
                    );
                    if attempt >= max_attempts {
                        return Err(Error::Timeout {
                            url: request.url.clone(),
                            attempts: attempt,
                        });
                    }
                }
                other => return other,
            }
        }
    }

    /// Prefix relative URLs with `api_base` and collapse repeated slashes
    pub fn normalize_url(&self, url: &str) -> String {
        let base = self.config.api_base.as_str();
        let absolute = url.starts_with("http://") || url.starts_with("https://");
        let full = if url.starts_with(base) || absolute {
            url.to_string()
        } else {
            format!("{base}{url}")
        };

        let cleaned = REPEATED_SLASHES.replace_all(&full, "$1/").into_owned();
        debug!("URL cleaning: '{}' -> '{}'", url, cleaned);
        cleaned
    }
}

impl std::fmt::Debug for PcoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PcoClient")
            .field("api_base", &self.config.api_base)
            .field("guard", &self.guard)
            .field("has_throttle", &self.throttle.is_some())
            .finish_non_exhaustive()
    }
}

/// Map non-2xx statuses to `Error::Request`
fn check_status(request: &ApiRequest, response: ApiResponse) -> Result<ApiResponse> {
    let status = response.status;
    if status.is_success() {
        return Ok(response);
    }

    let kind = if status.is_client_error() {
        "Client Error"
    } else if status.is_server_error() {
        "Server Error"
    } else {
        "Unexpected Status"
    };
    let message = format!(
        "{} {}: {} for url: {}",
        status.as_u16(),
        kind,
        status.canonical_reason().unwrap_or("Unknown"),
        request.url
    );
    debug!("Request resulted in API error: '{}'", message);

    Err(Error::request(status.as_u16(), message, response.body))
}
