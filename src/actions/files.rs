//! File actions: `listFiles`, `deleteFile`, and the `store` stub.

use serde_json::{json, Value};

use crate::actions::types::{DeleteFileParams, ListFilesParams, ProxyRequest};
use crate::error::{ProxyError, ProxyResult};
use crate::http::server::AppState;
use crate::upstream::OutboundRequest;

/// List files attached to an assistant. Raw upstream JSON.
pub async fn list(state: &AppState, request: &ProxyRequest) -> ProxyResult<Value> {
    let assistant = request.assistant()?;
    let params: ListFilesParams = request.parse_data()?;

    let base = state
        .resolver
        .resolve_base(assistant, request.assistant_host.as_deref())
        .await?;

    let mut outbound = OutboundRequest::get(format!("{base}/files/{assistant}"));
    if let Some(filter) = &params.filter {
        let encoded = serde_json::to_string(filter).map_err(|e| {
            ProxyError::Validation(format!("filter is not JSON-encodable: {e}"))
        })?;
        outbound = outbound.with_query("filter", encoded);
    }

    state.dispatcher.dispatch_json(&outbound).await
}

/// Delete one file by id.
///
/// The upstream acknowledges with 200 or 204; either counts as success and
/// the response body is never parsed.
pub async fn delete(state: &AppState, request: &ProxyRequest) -> ProxyResult<Value> {
    let assistant = request.assistant()?;
    let params: DeleteFileParams = request.parse_data()?;

    let file_id = params
        .file_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ProxyError::Validation("file_id is required".to_string()))?;

    let base = state
        .resolver
        .resolve_base(assistant, request.assistant_host.as_deref())
        .await?;

    let outbound = OutboundRequest::delete(format!("{base}/files/{assistant}/{file_id}"));
    state.dispatcher.dispatch(&outbound).await?;

    Ok(json!({ "deleted": true, "file_id": file_id }))
}

/// The `store` stub. Upload is not proxied; callers get a 501 with the
/// platform's upload constraints so they can go direct.
pub fn store_stub() -> ProxyResult<Value> {
    Err(ProxyError::NotImplemented {
        message: "file storage is not available through this proxy; upload directly to the assistant platform".to_string(),
        details: json!({
            "limits": {
                "max_file_size_mb": 100,
                "accepted_types": ["pdf", "txt", "md", "docx", "json"]
            }
        }),
    })
}
