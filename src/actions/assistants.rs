//! Control-plane actions: `describeAssistant` and `listAssistants`.

use serde_json::Value;

use crate::actions::types::ProxyRequest;
use crate::error::ProxyResult;
use crate::http::server::AppState;
use crate::upstream::OutboundRequest;

/// Fetch metadata for one assistant. Raw upstream JSON.
pub async fn describe(state: &AppState, request: &ProxyRequest) -> ProxyResult<Value> {
    let assistant = request.assistant()?;
    state.resolver.describe_assistant(assistant).await
}

/// List all assistants in the project. Raw upstream JSON.
pub async fn list(state: &AppState) -> ProxyResult<Value> {
    let request = OutboundRequest::get(state.resolver.list_url());
    state.dispatcher.dispatch_json(&request).await
}
