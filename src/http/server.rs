//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the action endpoint
//! - Wire up middleware (CORS, trace, request ID, limits, timeout, auth)
//! - Bind the server to a listener
//! - Initialize the dispatcher and host resolver shared by all requests
//! - Translate action results into response envelopes

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::actions::{dispatch_action, ProxyRequest};
use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::http::request::RequestIdLayer;
use crate::http::response::{ErrorEnvelope, SuccessEnvelope};
use crate::observability::metrics;
use crate::security::auth::require_bearer;
use crate::security::cors::cors_layer;
use crate::upstream::{Dispatcher, HostResolver, MemoryHostStore, SystemClock};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProxyConfig>,
    pub dispatcher: Arc<Dispatcher>,
    pub resolver: Arc<HostResolver>,
}

/// HTTP server for the assistant proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, ProxyError> {
        let dispatcher = Arc::new(Dispatcher::new(
            &config.upstream,
            &config.retries,
            &config.timeouts,
        )?);

        let resolver = Arc::new(HostResolver::new(
            Arc::new(MemoryHostStore::new()),
            Arc::new(SystemClock),
            Duration::from_secs(config.host_cache.ttl_secs),
            config.upstream.control_plane_url.clone(),
            dispatcher.clone(),
        ));

        let state = AppState {
            config: Arc::new(config.clone()),
            dispatcher,
            resolver,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let api = Router::new()
            .route(
                "/",
                post(invoke_handler)
                    .options(preflight_handler)
                    .fallback(method_not_allowed),
            )
            .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

        Router::new()
            .merge(api)
            .route("/healthz", get(health_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_size))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&config.cors))
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            control_plane = %self.config.upstream.control_plane_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Main action handler.
///
/// The body is read as bytes and parsed by hand so malformed JSON yields
/// the failure envelope rather than a framework rejection.
async fn invoke_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SuccessEnvelope>, ProxyError> {
    let start = Instant::now();

    let request: ProxyRequest = serde_json::from_slice(&body)
        .map_err(|e| ProxyError::Validation(format!("invalid JSON body: {e}")))?;

    tracing::debug!(
        action = %request.action,
        assistant = request.assistant_name.as_deref().unwrap_or(""),
        "Dispatching action"
    );

    let result = dispatch_action(&state, &request).await;
    let status = match &result {
        Ok(_) => 200,
        Err(e) => e.status_code(),
    };
    metrics::record_action(&request.action, status, start);

    let data = result?;
    Ok(Json(SuccessEnvelope::new(request.action, data)))
}

/// CORS preflight fallback for non-browser OPTIONS calls; browser
/// preflights are answered by the CORS layer before reaching the router.
async fn preflight_handler() -> StatusCode {
    StatusCode::OK
}

/// Envelope-shaped 405 for unsupported methods on the action endpoint.
async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorEnvelope::new("method not allowed; use POST", None)),
    )
}

/// Liveness probe.
async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            // No signal handler means no signal will ever arrive; park
            // instead of shutting the server down.
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}
