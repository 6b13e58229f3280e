//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at startup
//! - Respect RUST_LOG when set, falling back to the configured level

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the logging subsystem.
///
/// `RUST_LOG` wins when present; otherwise the configured level applies to
/// this crate with quieter middleware logs.
pub fn init(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!(
                    "assistant_proxy={log_level},tower_http=info"
                ))
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
