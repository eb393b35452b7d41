//! Telemetry Source - request/response boundary to the telemetry API
//!
//! Production code uses `HttpTelemetryClient`. Tests use
//! `FakeTelemetrySource` with pre-configured responses per path.

use crate::error::FetchError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::debug;

/// Default per-request deadline
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One GET against the API: a path plus ordered query parameters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiRequest {
    path: String,
    query: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Value of a query parameter, if present
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Trait abstraction over the telemetry API
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Fetch one endpoint and return its JSON body
    async fn fetch(&self, request: &ApiRequest) -> Result<Value, FetchError>;
}

// ============================================================================
// HTTP client (production)
// ============================================================================

/// reqwest-backed client for the telemetry API
#[derive(Debug, Clone)]
pub struct HttpTelemetryClient {
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpTelemetryClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn map_send_error(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Transport(err.to_string())
        }
    }

    fn check_status(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, FetchError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            debug!(path, status = status.as_u16(), "non-success status");
            Err(FetchError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            })
        }
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, FetchError> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// GET returning the raw body (CSV export, report downloads)
    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let response = self.check_status(path, response)?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    /// POST without a body, returning the raw response (generated PDFs)
    pub async fn post_bytes(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .post(self.url(path))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let response = self.check_status(path, response)?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    /// GET decoded into `T`
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let value = self.fetch(&ApiRequest::get(path)).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// POST with an optional JSON body, decoded into `T`
    pub async fn post_json<B, T>(&self, path: &str, body: Option<&B>) -> Result<T, FetchError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let mut builder = self.client.post(self.url(path));
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = builder.send().await.map_err(|e| self.map_send_error(e))?;
        let response = self.check_status(path, response)?;
        Self::decode(response).await
    }

    /// DELETE decoded into `T`
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let response = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let response = self.check_status(path, response)?;
        Self::decode(response).await
    }
}

#[async_trait]
impl TelemetrySource for HttpTelemetryClient {
    async fn fetch(&self, request: &ApiRequest) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(self.url(request.path()))
            .query(request.query())
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let response = self.check_status(request.path(), response)?;
        Self::decode(response).await
    }
}

// ============================================================================
// Fake source (tests)
// ============================================================================

/// Scripted reply of the fake source
#[derive(Debug, Clone)]
pub enum FakeResponse {
    Json(Value),
    Fail(FetchError),
    /// Never resolves
    Hang,
}

/// Fake telemetry source with pre-defined responses per path
///
/// A path with one scripted response keeps returning it; with several they
/// are consumed in order and the last one repeats.
#[derive(Default)]
pub struct FakeTelemetrySource {
    responses: Mutex<HashMap<String, Vec<FakeResponse>>>,
    requests: Mutex<Vec<ApiRequest>>,
    gate: Option<Arc<Semaphore>>,
}

impl FakeTelemetrySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold every request until `release` is called
    pub fn gated() -> Self {
        Self {
            gate: Some(Arc::new(Semaphore::new(0))),
            ..Self::default()
        }
    }

    /// Queue a response for `path`
    pub fn respond(&self, path: &str, response: FakeResponse) -> &Self {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(path.to_string())
            .or_default()
            .push(response);
        self
    }

    pub fn respond_json(&self, path: &str, value: Value) -> &Self {
        self.respond(path, FakeResponse::Json(value))
    }

    pub fn respond_error(&self, path: &str, error: FetchError) -> &Self {
        self.respond(path, FakeResponse::Fail(error))
    }

    /// Let `n` held requests proceed
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    /// Number of requests issued for `path`
    pub fn calls(&self, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|r| r.path() == path)
            .count()
    }

    /// Every request issued so far, in order
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn next_response(&self, path: &str) -> FakeResponse {
        let mut responses = self.responses.lock().unwrap_or_else(PoisonError::into_inner);
        match responses.get_mut(path) {
            Some(queue) if queue.len() > 1 => queue.remove(0),
            Some(queue) if queue.len() == 1 => queue[0].clone(),
            _ => FakeResponse::Fail(FetchError::Status {
                status: 404,
                path: path.to_string(),
            }),
        }
    }
}

#[async_trait]
impl TelemetrySource for FakeTelemetrySource {
    async fn fetch(&self, request: &ApiRequest) -> Result<Value, FetchError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        match self.next_response(request.path()) {
            FakeResponse::Json(value) => Ok(value),
            FakeResponse::Fail(error) => Err(error),
            FakeResponse::Hang => std::future::pending().await,
        }
    }
}
