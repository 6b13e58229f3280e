//! Assistant host discovery and base-URL resolution.
//!
//! # Responsibilities
//! - Map an assistant name to its serving host via the control plane
//! - Cache resolved base URLs with a TTL
//! - Normalize explicit and discovered hosts into a base URL

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::error::{ProxyError, ProxyResult};
use crate::observability::metrics;
use crate::upstream::cache::{Clock, HostEntry, HostStore};
use crate::upstream::dispatch::{Dispatcher, OutboundRequest};

/// Resolves per-assistant base URLs, caching discoveries with a TTL.
pub struct HostResolver {
    store: Arc<dyn HostStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    control_plane_url: String,
    dispatcher: Arc<Dispatcher>,
}

impl HostResolver {
    pub fn new(
        store: Arc<dyn HostStore>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
        control_plane_url: impl Into<String>,
        dispatcher: Arc<Dispatcher>,
    ) -> Self {
        Self {
            store,
            clock,
            ttl,
            control_plane_url: control_plane_url.into(),
            dispatcher,
        }
    }

    /// Resolve the base URL for an assistant.
    ///
    /// An explicit host bypasses the cache entirely. Otherwise a fresh
    /// cached entry is returned without network I/O; a miss or expired
    /// entry triggers a control-plane discovery call, and the result is
    /// cached for the TTL.
    pub async fn resolve_base(
        &self,
        assistant: &str,
        explicit_host: Option<&str>,
    ) -> ProxyResult<String> {
        if let Some(host) = explicit_host {
            return Ok(normalize_assistant_base(host));
        }

        let now = self.clock.now();
        if let Some(entry) = self.store.get(assistant) {
            if entry.is_fresh(now) {
                metrics::record_host_cache(true);
                tracing::debug!(assistant, "Host cache hit");
                return Ok(entry.base_url);
            }
        }
        metrics::record_host_cache(false);

        let described = self.describe_assistant(assistant).await?;
        let host = described
            .get("host")
            .and_then(Value::as_str)
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ProxyError::MissingHost(assistant.to_string()))?;

        let base_url = normalize_assistant_base(host);
        self.store.put(
            assistant,
            HostEntry {
                base_url: base_url.clone(),
                expires_at: now + self.ttl,
            },
        );
        tracing::info!(assistant, base_url = %base_url, "Resolved assistant host");

        Ok(base_url)
    }

    /// Fetch assistant metadata from the control plane.
    pub async fn describe_assistant(&self, assistant: &str) -> ProxyResult<Value> {
        let request = OutboundRequest::get(self.describe_url(assistant));
        self.dispatcher.dispatch_json(&request).await
    }

    /// Control-plane URL for one assistant.
    fn describe_url(&self, assistant: &str) -> String {
        format!("{}/{}", self.list_url(), assistant)
    }

    /// Control-plane URL for the assistant collection.
    pub fn list_url(&self) -> String {
        format!(
            "{}/assistant/assistants",
            self.control_plane_url.trim_end_matches('/')
        )
    }
}

/// Normalize a host into an assistant base URL.
///
/// Ensures an https scheme when none is given, strips trailing slashes, and
/// appends the `/assistant` path segment unless it is already the final
/// segment. Idempotent.
pub fn normalize_assistant_base(host: &str) -> String {
    let trimmed = host.trim().trim_end_matches('/');
    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    if with_scheme.ends_with("/assistant") {
        with_scheme
    } else {
        format!("{with_scheme}/assistant")
    }
}
