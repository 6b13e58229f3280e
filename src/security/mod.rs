//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → cors.rs (origin policy, preflight short-circuit)
//!     → auth.rs (bearer token check when configured)
//!     → Pass to the action endpoint
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any auth check failure
//! - Preflights never require credentials

pub mod auth;
pub mod cors;

pub use auth::require_bearer;
pub use cors::cors_layer;
