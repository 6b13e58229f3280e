//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (TTL > 0, retry caps sane)
//! - Check URLs and addresses parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig -> Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::ProxyConfig;

/// A single semantic violation in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g. "upstream.api_key").
    pub field: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate the configuration, collecting every violation.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a valid socket address", config.listener.bind_address),
        ));
    }

    if config.listener.max_body_size == 0 {
        errors.push(ValidationError::new(
            "listener.max_body_size",
            "must be greater than zero",
        ));
    }

    if config.upstream.api_key.trim().is_empty() {
        errors.push(ValidationError::new(
            "upstream.api_key",
            "must be set (PINECONE_API_KEY)",
        ));
    }

    if url::Url::parse(&config.upstream.control_plane_url).is_err() {
        errors.push(ValidationError::new(
            "upstream.control_plane_url",
            format!("'{}' is not a valid URL", config.upstream.control_plane_url),
        ));
    }

    if config.cors.allowed_origins.is_empty() {
        errors.push(ValidationError::new(
            "cors.allowed_origins",
            "must contain at least one origin",
        ));
    }

    if config.retries.max_retries > 5 {
        errors.push(ValidationError::new(
            "retries.max_retries",
            "must be 5 or fewer",
        ));
    }

    if config.host_cache.ttl_secs == 0 {
        errors.push(ValidationError::new(
            "host_cache.ttl_secs",
            "must be greater than zero",
        ));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "'{}' is not a valid socket address",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
