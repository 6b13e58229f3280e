//! Inbound request envelope and per-action payload types.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ProxyError, ProxyResult};

/// The inbound action request.
#[derive(Debug, Deserialize)]
pub struct ProxyRequest {
    /// Action name; see [`crate::actions::SUPPORTED_ACTIONS`].
    pub action: String,

    #[serde(default)]
    pub assistant_name: Option<String>,

    /// Accepted as a fallback alias for `assistant_name`.
    #[serde(default)]
    pub assistant_id: Option<String>,

    /// Explicit data-plane host; skips discovery and the cache.
    #[serde(default)]
    pub assistant_host: Option<String>,

    /// Action-specific payload.
    #[serde(default)]
    pub data: Value,
}

impl ProxyRequest {
    /// The target assistant name, with `assistant_id` as fallback.
    pub fn assistant(&self) -> ProxyResult<&str> {
        self.assistant_name
            .as_deref()
            .or(self.assistant_id.as_deref())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ProxyError::Validation("assistant_name is required".to_string()))
    }

    /// Deserialize `data` into the action's payload type. A missing or
    /// null `data` behaves like an empty object.
    pub fn parse_data<T: DeserializeOwned>(&self) -> ProxyResult<T> {
        let data = if self.data.is_null() {
            Value::Object(serde_json::Map::new())
        } else {
            self.data.clone()
        };
        serde_json::from_value(data)
            .map_err(|e| ProxyError::Validation(format!("invalid data payload: {e}")))
    }
}

/// One prior or current conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Payload for the `chat` action.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChatParams {
    /// Current user message; appended after `context`.
    pub message: Option<String>,
    /// Ordered prior turns.
    pub context: Vec<ChatMessage>,
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub filter: Option<Value>,
    pub json_response: Option<bool>,
    /// Accepted for compatibility; responses are proxied whole.
    pub stream: Option<bool>,
    pub include_highlights: Option<bool>,
    pub context_options: Option<Value>,
    pub top_k: Option<u32>,
}

/// Payload for the `search` action.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Ordered turns; wins over `query` when non-empty.
    pub messages: Vec<ChatMessage>,
    pub query: Option<String>,
    pub top_k: Option<u32>,
    pub filter: Option<Value>,
    pub context_options: Option<Value>,
}

/// Payload for the `listFiles` action.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListFilesParams {
    /// Structured metadata filter, JSON-encoded into a query parameter.
    pub filter: Option<Value>,
}

/// Payload for the `deleteFile` action.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteFileParams {
    pub file_id: Option<String>,
}
