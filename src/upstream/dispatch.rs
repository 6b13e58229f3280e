//! Outbound request dispatch.
//!
//! # Responsibilities
//! - Issue every outbound HTTP call in the system
//! - Inject the platform API key and API-version headers
//! - Retry rate-limited (429) responses with bounded backoff
//! - Enrich non-2xx responses into structured upstream errors

use std::time::Duration;

use reqwest::{header, Client, Method, Response, StatusCode};
use serde_json::{json, Value};

use crate::config::{RetryConfig, TimeoutConfig, UpstreamConfig};
use crate::error::{ProxyError, ProxyResult};
use crate::observability::metrics;
use crate::upstream::backoff::retry_delay;

/// Header carrying the platform API key.
pub const API_KEY_HEADER: &str = "Api-Key";
/// Header carrying the platform API version.
pub const API_VERSION_HEADER: &str = "X-Pinecone-API-Version";

/// An outbound call, held as a value so each retry attempt can rebuild the
/// wire request from scratch.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl OutboundRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self {
            method: Method::DELETE,
            url: url.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// The single point of outbound HTTP, retry, and failure enrichment.
pub struct Dispatcher {
    client: Client,
    api_key: String,
    api_version: String,
    max_retries: u32,
    base_delay_ms: u64,
    jitter_ms: u64,
}

impl Dispatcher {
    /// Build a dispatcher from configuration.
    pub fn new(
        upstream: &UpstreamConfig,
        retries: &RetryConfig,
        timeouts: &TimeoutConfig,
    ) -> ProxyResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.upstream_secs))
            .build()
            .map_err(|e| ProxyError::Upstream {
                status: 500,
                message: format!("failed to build upstream client: {e}"),
                details: None,
            })?;

        Ok(Self {
            client,
            api_key: upstream.api_key.clone(),
            api_version: upstream.api_version.clone(),
            max_retries: retries.max_retries,
            base_delay_ms: retries.base_delay_ms,
            jitter_ms: retries.jitter_ms,
        })
    }

    /// Issue the request, retrying on 429 up to the configured cap.
    ///
    /// Returns the response on any 2xx status; any other terminal status is
    /// converted into an `Upstream` error carrying the request URL and a
    /// best-effort capture of the response body.
    pub async fn dispatch(&self, request: &OutboundRequest) -> ProxyResult<Response> {
        let mut attempt: u32 = 0;

        loop {
            let response = self.send_once(request).await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS && attempt < self.max_retries {
                attempt += 1;
                let delay = retry_delay(
                    attempt,
                    parse_retry_after(&response),
                    self.base_delay_ms,
                    self.jitter_ms,
                );
                tracing::warn!(
                    url = %request.url,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Upstream rate limited, retrying"
                );
                metrics::record_upstream_retry();
                tokio::time::sleep(delay).await;
                continue;
            }

            if !status.is_success() {
                return Err(self.enrich_failure(request, response).await);
            }

            return Ok(response);
        }
    }

    /// Dispatch and parse the response body as JSON.
    pub async fn dispatch_json(&self, request: &OutboundRequest) -> ProxyResult<Value> {
        let url = request.url.clone();
        let response = self.dispatch(request).await?;
        response.json().await.map_err(|e| ProxyError::Upstream {
            status: 502,
            message: format!("upstream returned invalid JSON: {e}"),
            details: Some(json!({ "url": url })),
        })
    }

    /// Build and send one wire request.
    async fn send_once(&self, request: &OutboundRequest) -> ProxyResult<Response> {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(API_VERSION_HEADER, &self.api_version);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        builder.send().await.map_err(|e| ProxyError::Upstream {
            status: 502,
            message: format!("upstream request failed: {e}"),
            details: Some(json!({ "url": request.url })),
        })
    }

    /// Convert a terminal non-2xx response into an `Upstream` error.
    ///
    /// The body is captured as JSON when it parses, as text otherwise, and
    /// omitted when empty or unreadable. Capture failures never affect
    /// control flow.
    async fn enrich_failure(&self, request: &OutboundRequest, response: Response) -> ProxyError {
        let status = response.status();
        let message = match status.canonical_reason() {
            Some(reason) => format!("upstream returned {} {}", status.as_u16(), reason),
            None => format!("upstream returned {}", status.as_u16()),
        };

        let mut details = serde_json::Map::new();
        details.insert("url".to_string(), Value::String(request.url.clone()));
        if let Ok(text) = response.text().await {
            if !text.is_empty() {
                let body = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));
                details.insert("body".to_string(), body);
            }
        }

        ProxyError::Upstream {
            status: status.as_u16(),
            message,
            details: Some(Value::Object(details)),
        }
    }
}

/// Parse a positive integral Retry-After header, in seconds.
fn parse_retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}
