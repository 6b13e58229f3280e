//! Inbound bearer-token authentication.

use axum::extract::{Request, State};
use axum::http::{header, Method};
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ProxyError;
use crate::http::server::AppState;

/// Require a matching bearer token when one is configured.
///
/// Passthrough mode when no token is set. OPTIONS is always allowed so
/// CORS preflights never need credentials.
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ProxyError> {
    let expected = &state.config.auth.bearer_token;
    if expected.is_empty() || request.method() == Method::OPTIONS {
        return Ok(next.run(request).await);
    }

    let provided = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match provided {
        Some(value) if value == format!("Bearer {expected}") => Ok(next.run(request).await),
        _ => {
            tracing::warn!("Rejected request with missing or invalid bearer token");
            Err(ProxyError::Unauthorized)
        }
    }
}
