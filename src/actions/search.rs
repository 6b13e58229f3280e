//! The `search` action (context snippet retrieval).

use serde_json::{json, Map, Value};

use crate::actions::types::{ProxyRequest, SearchParams};
use crate::error::{ProxyError, ProxyResult};
use crate::http::server::AppState;
use crate::upstream::OutboundRequest;

/// Retrieve context snippets for a query or conversation.
pub async fn handle(state: &AppState, request: &ProxyRequest) -> ProxyResult<Value> {
    let assistant = request.assistant()?;
    let params: SearchParams = request.parse_data()?;

    let mut body = Map::new();
    // Non-empty messages win over query; neither is a validation failure
    // caught before any network call.
    if !params.messages.is_empty() {
        body.insert("messages".to_string(), json!(params.messages));
    } else if let Some(query) = params.query.as_deref().filter(|q| !q.is_empty()) {
        body.insert("query".to_string(), json!(query));
    } else {
        return Err(ProxyError::Validation(
            "query or messages is required".to_string(),
        ));
    }

    if let Some(top_k) = params.top_k {
        body.insert("top_k".to_string(), json!(top_k));
    }
    if let Some(filter) = &params.filter {
        body.insert("filter".to_string(), filter.clone());
    }
    if let Some(context_options) = &params.context_options {
        body.insert("context_options".to_string(), context_options.clone());
    }

    let base = state
        .resolver
        .resolve_base(assistant, request.assistant_host.as_deref())
        .await?;

    let url = format!("{base}/chat/{assistant}/context");
    let upstream = state
        .dispatcher
        .dispatch_json(&OutboundRequest::post(url, Value::Object(body)))
        .await?;

    Ok(shape_snippets(&upstream))
}

/// Map the upstream context response into the client-facing shape.
fn shape_snippets(upstream: &Value) -> Value {
    let mut data = Map::new();
    data.insert(
        "snippets".to_string(),
        upstream.get("snippets").cloned().unwrap_or_else(|| json!([])),
    );
    data.insert(
        "usage".to_string(),
        upstream.get("usage").cloned().unwrap_or_else(|| json!({})),
    );
    if let Some(id) = upstream.get("id") {
        data.insert("id".to_string(), id.clone());
    }
    Value::Object(data)
}
