//! The `chat` action.

use serde_json::{json, Map, Value};

use crate::actions::types::{ChatMessage, ChatParams, ProxyRequest};
use crate::error::ProxyResult;
use crate::http::server::AppState;
use crate::upstream::OutboundRequest;

/// Model used when the caller does not pick one.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Forward a chat turn to the assistant and shape the reply.
pub async fn handle(state: &AppState, request: &ProxyRequest) -> ProxyResult<Value> {
    let assistant = request.assistant()?;
    let params: ChatParams = request.parse_data()?;

    let base = state
        .resolver
        .resolve_base(assistant, request.assistant_host.as_deref())
        .await?;

    // Message list = prior context + the current turn, when present.
    let mut messages: Vec<ChatMessage> = params.context.clone();
    if let Some(message) = &params.message {
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: message.clone(),
        });
    }

    if params.stream.unwrap_or(false) {
        tracing::debug!(assistant, "stream requested; responses are proxied whole");
    }

    let mut body = Map::new();
    body.insert("messages".to_string(), json!(messages));
    body.insert(
        "model".to_string(),
        json!(params.model.as_deref().unwrap_or(DEFAULT_MODEL)),
    );
    body.insert("stream".to_string(), json!(false));
    body.insert(
        "temperature".to_string(),
        json!(params.temperature.unwrap_or(0.0)),
    );
    body.insert(
        "include_highlights".to_string(),
        json!(params.include_highlights.unwrap_or(false)),
    );
    if let Some(filter) = &params.filter {
        body.insert("filter".to_string(), filter.clone());
    }
    if let Some(json_response) = params.json_response {
        body.insert("json_response".to_string(), json!(json_response));
    }
    if let Some(context_options) = &params.context_options {
        body.insert("context_options".to_string(), context_options.clone());
    }
    if let Some(top_k) = params.top_k {
        body.insert("top_k".to_string(), json!(top_k));
    }

    let url = format!("{base}/chat/{assistant}");
    let upstream = state
        .dispatcher
        .dispatch_json(&OutboundRequest::post(url, Value::Object(body)))
        .await?;

    Ok(shape_reply(&upstream))
}

/// Map the upstream chat response into the client-facing shape.
fn shape_reply(upstream: &Value) -> Value {
    let mut data = Map::new();
    data.insert(
        "response".to_string(),
        json!(upstream
            .pointer("/message/content")
            .and_then(Value::as_str)
            .unwrap_or("")),
    );
    data.insert(
        "citations".to_string(),
        upstream.get("citations").cloned().unwrap_or_else(|| json!([])),
    );
    data.insert(
        "usage".to_string(),
        upstream.get("usage").cloned().unwrap_or_else(|| json!({})),
    );
    if let Some(model) = upstream.get("model") {
        data.insert("model".to_string(), model.clone());
    }
    Value::Object(data)
}
