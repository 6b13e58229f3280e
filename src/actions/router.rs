//! Action routing.
//!
//! # Responsibilities
//! - Map the inbound action name to its handler
//! - Reject unknown actions before any network call

use serde_json::Value;

use crate::actions::types::ProxyRequest;
use crate::actions::{assistants, chat, files, search};
use crate::error::{ProxyError, ProxyResult};
use crate::http::server::AppState;

/// Every action the proxy understands, in the order they are documented.
pub const SUPPORTED_ACTIONS: &[&str] = &[
    "chat",
    "search",
    "describeAssistant",
    "listAssistants",
    "listFiles",
    "deleteFile",
    "store",
];

/// Dispatch one validated inbound request to its action handler.
pub async fn dispatch_action(state: &AppState, request: &ProxyRequest) -> ProxyResult<Value> {
    match request.action.as_str() {
        "chat" => chat::handle(state, request).await,
        "search" => search::handle(state, request).await,
        "describeAssistant" => assistants::describe(state, request).await,
        "listAssistants" => assistants::list(state).await,
        "listFiles" => files::list(state, request).await,
        "deleteFile" => files::delete(state, request).await,
        "store" => files::store_stub(),
        other => Err(ProxyError::Validation(format!(
            "unsupported action '{}'; supported actions: {}",
            other,
            SUPPORTED_ACTIONS.join(", ")
        ))),
    }
}
