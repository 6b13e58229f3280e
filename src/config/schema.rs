//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the assistant proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, body limits).
    pub listener: ListenerConfig,

    /// Upstream assistant platform settings.
    pub upstream: UpstreamConfig,

    /// Inbound authentication settings.
    pub auth: AuthConfig,

    /// CORS settings for browser clients.
    pub cors: CorsConfig,

    /// Retry configuration for rate-limited upstream calls.
    pub retries: RetryConfig,

    /// Host-discovery cache settings.
    pub host_cache: HostCacheConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum accepted request body size in bytes.
    pub max_body_size: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_body_size: 1024 * 1024,
        }
    }
}

/// Upstream assistant platform configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Control-plane base URL for assistant management and host discovery.
    pub control_plane_url: String,

    /// Platform API key, injected on every outbound call.
    /// Normally supplied via the PINECONE_API_KEY environment variable.
    pub api_key: String,

    /// Value for the API-version header on every outbound call.
    pub api_version: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            control_plane_url: "https://api.pinecone.io".to_string(),
            api_key: String::new(),
            api_version: "2025-04".to_string(),
        }
    }
}

/// Inbound authentication configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AuthConfig {
    /// Bearer token required on inbound requests. Empty disables the check.
    pub bearer_token: String,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins. The first entry is the default; "*" allows any.
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

/// Retry configuration for rate-limited upstream responses.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of retries after the initial attempt.
    pub max_retries: u32,

    /// Fallback delay unit in milliseconds; attempt N waits N x this.
    pub base_delay_ms: u64,

    /// Upper bound on the random jitter added to fallback delays.
    pub jitter_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 500,
            jitter_ms: 100,
        }
    }
}

/// Host-discovery cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HostCacheConfig {
    /// Time-to-live for cached assistant hosts, in seconds.
    pub ttl_secs: u64,
}

impl Default for HostCacheConfig {
    fn default() -> Self {
        Self { ttl_secs: 300 }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout for upstream calls, in seconds.
    pub connect_secs: u64,

    /// Total inbound request timeout in seconds.
    pub request_secs: u64,

    /// Per-call upstream request timeout in seconds.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 60,
            upstream_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
