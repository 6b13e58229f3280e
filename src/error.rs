//! Proxy error taxonomy.
//!
//! Every failure in the system is one of these variants. Handlers build and
//! propagate `ProxyError`; the conversion into the client-facing failure
//! envelope happens once, at the HTTP handler boundary.

use serde_json::Value;
use thiserror::Error;

/// Errors surfaced to the client as a failure envelope.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Missing required field or unsupported action. Detected before any
    /// network call.
    #[error("{0}")]
    Validation(String),

    /// Inbound bearer token missing or mismatched.
    #[error("unauthorized")]
    Unauthorized,

    /// Non-2xx response from the assistant platform after retries were
    /// exhausted. Carries the upstream status and a best-effort capture of
    /// the request URL and response body.
    #[error("{message}")]
    Upstream {
        status: u16,
        message: String,
        details: Option<Value>,
    },

    /// Host-discovery response lacked the expected host field.
    #[error("assistant '{0}' has no host in its describe response")]
    MissingHost(String),

    /// Action is recognized but intentionally not implemented.
    #[error("{message}")]
    NotImplemented { message: String, details: Value },
}

/// Result type for proxy operations.
pub type ProxyResult<T> = Result<T, ProxyError>;

impl ProxyError {
    /// HTTP status for the failure envelope.
    pub fn status_code(&self) -> u16 {
        match self {
            ProxyError::Validation(_) => 400,
            ProxyError::Unauthorized => 401,
            // Upstream status passes through; fall back to 500 when the
            // recorded value is not a valid HTTP status.
            ProxyError::Upstream { status, .. } => {
                if (100..=599).contains(status) {
                    *status
                } else {
                    500
                }
            }
            ProxyError::MissingHost(_) => 500,
            ProxyError::NotImplemented { .. } => 501,
        }
    }

    /// Structured detail payload for the failure envelope, when any.
    pub fn details(&self) -> Option<&Value> {
        match self {
            ProxyError::Upstream { details, .. } => details.as_ref(),
            ProxyError::NotImplemented { details, .. } => Some(details),
            _ => None,
        }
    }
}
