//! Request/response values and the transport seam
//!
//! `Transport` performs exactly one HTTP attempt. Retry policy (timeouts,
//! rate limits) lives above it in `PcoClient`, so any transport gets the same
//! behavior.

use crate::auth::Authenticator;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Query parameters for a request
pub type QueryParams = HashMap<String, String>;

/// A single API request, described as data.
///
/// Retries re-send the same value, so method, URL, query and body are
/// identical on every attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL
    pub url: String,
    /// Query parameters
    pub query: QueryParams,
    /// JSON body
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Create a request with no query and no body
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: QueryParams::new(),
            body: None,
        }
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Replace all query parameters
    #[must_use]
    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// A received API response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status
    pub status: StatusCode,
    /// Response headers (case-insensitive lookup)
    pub headers: HeaderMap,
    /// Raw response body, possibly empty
    pub body: String,
}

impl ApiResponse {
    /// Create a response from its parts
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<String>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Create a response with a JSON body and no headers
    pub fn with_json(status: StatusCode, body: &Value) -> Self {
        Self::new(status, HeaderMap::new(), body.to_string())
    }

    /// Header value as a string, if present and valid UTF-8
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Decode the body as JSON; `None` for 204 or an empty body
    pub fn json(&self) -> Result<Option<Value>> {
        if self.status == StatusCode::NO_CONTENT || self.body.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&self.body)?))
    }
}

/// Performs one HTTP attempt
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request once and return whatever the server answered
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

/// `Transport` backed by reqwest
pub struct ReqwestTransport {
    client: Client,
    authenticator: Authenticator,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Create a transport with its own reqwest client
    pub fn new(authenticator: Authenticator, timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            authenticator,
            timeout,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let url = url::Url::parse(&request.url)?;

        let mut req = self
            .client
            .request(request.method.clone(), url)
            .timeout(self.timeout);

        if !request.query.is_empty() {
            req = req.query(&request.query);
        }

        if let Some(ref body) = request.body {
            req = req.json(body);
        }

        req = self.authenticator.apply(req);

        debug!("Executing {} request to '{}'", request.method, request.url);

        let response = req.send().await.map_err(|e| timeout_or_http(e, request))?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| timeout_or_http(e, request))?;

        Ok(ApiResponse::new(status, headers, body))
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("auth_type", &self.authenticator.config().auth_type())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Timeouts become `Error::Timeout` so the client can retry them
fn timeout_or_http(e: reqwest::Error, request: &ApiRequest) -> Error {
    if e.is_timeout() {
        Error::Timeout {
            url: request.url.clone(),
            attempts: 1,
        }
    } else {
        Error::Http(e)
    }
}
