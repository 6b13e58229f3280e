//! Response envelopes.
//!
//! # Responsibilities
//! - Define the success and failure envelope shapes
//! - Convert `ProxyError` into a failure response, exactly once, at the
//!   handler boundary

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::error::ProxyError;

/// Envelope for a completed action.
#[derive(Debug, Serialize)]
pub struct SuccessEnvelope {
    pub success: bool,
    #[serde(rename = "type")]
    pub kind: String,
    pub data: Value,
}

impl SuccessEnvelope {
    pub fn new(kind: impl Into<String>, data: Value) -> Self {
        Self {
            success: true,
            kind: kind.into(),
            data,
        }
    }
}

/// Envelope for a failed action.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>, details: Option<Value>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let envelope = ErrorEnvelope::new(self.to_string(), self.details().cloned());

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %envelope.error, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %envelope.error, "Request rejected");
        }

        (status, Json(envelope)).into_response()
    }
}
