//! In-memory transport for unit tests

use super::transport::{ApiRequest, ApiResponse, Transport};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::PcoClient;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Replays queued responses and records every request it sees
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<ApiResponse>>>,
    seen: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, response: Result<ApiResponse>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn push_json(&self, status: u16, body: Value) {
        let status = StatusCode::from_u16(status).unwrap();
        self.push(Ok(ApiResponse::with_json(status, &body)));
    }

    pub fn push_rate_limited(&self, retry_after: Option<&'static str>) {
        let mut headers = HeaderMap::new();
        if let Some(value) = retry_after {
            headers.insert("retry-after", HeaderValue::from_static(value));
        }
        self.push(Ok(ApiResponse::new(
            StatusCode::TOO_MANY_REQUESTS,
            headers,
            "",
        )));
    }

    pub fn push_timeout(&self) {
        self.push(Err(Error::Timeout {
            url: String::new(),
            attempts: 1,
        }));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        self.seen.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::unexpected("no scripted response left")))
    }
}

/// A client over `transport` with `https://pco.test` as its base
pub fn scripted_client(transport: &Arc<ScriptedTransport>) -> PcoClient {
    let config = ClientConfig::builder()
        .oauth_token("test-token")
        .api_base("https://pco.test")
        .build();
    PcoClient::with_transport(config, transport.clone())
}
