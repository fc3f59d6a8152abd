//! Upstream payload fetching
//!
//! The pipeline only needs "GET this URL as JSON and give me the status and
//! body". Non-2xx responses are returned, not raised, so the pipeline owns
//! the status policy and test fakes can simulate any response.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use types::errors::UpstreamError;
use types::snapshot::SNAPSHOT_CONTENT_TYPE;

/// Raw upstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedBody {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchedBody {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues the upstream GET request.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch_json(&self, url: &str) -> Result<FetchedBody, UpstreamError>;
}

/// HTTP fetcher backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_json(&self, url: &str) -> Result<FetchedBody, UpstreamError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, SNAPSHOT_CONTENT_TYPE)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        Ok(FetchedBody::new(status, body.to_vec()))
    }
}

/// Fetcher that serves a fixed, replaceable response.
///
/// Used to drive the pipeline without a network.
#[derive(Debug)]
pub struct StaticFetcher {
    response: Mutex<Result<FetchedBody, UpstreamError>>,
    calls: AtomicU64,
}

impl StaticFetcher {
    /// Respond with `status` and `body` to every request.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self::with_result(Ok(FetchedBody::new(status, body)))
    }

    /// Respond with `200` and the JSON encoding of `payload`.
    pub fn json(payload: &serde_json::Value) -> Self {
        Self::new(200, payload.to_string())
    }

    /// Fail every request with `err`.
    pub fn failing(err: UpstreamError) -> Self {
        Self::with_result(Err(err))
    }

    fn with_result(result: Result<FetchedBody, UpstreamError>) -> Self {
        Self {
            response: Mutex::new(result),
            calls: AtomicU64::new(0),
        }
    }

    /// Replace the response served from now on.
    pub fn set_response(&self, status: u16, body: impl Into<Vec<u8>>) {
        if let Ok(mut response) = self.response.lock() {
            *response = Ok(FetchedBody::new(status, body));
        }
    }

    /// Number of requests served so far.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch_json(&self, _url: &str) -> Result<FetchedBody, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response
            .lock()
            .map_err(|_| UpstreamError::Transport("fetcher lock poisoned".to_string()))?
            .clone()
    }
}
