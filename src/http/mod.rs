//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID)
//!     → [security: CORS, bearer auth]
//!     → actions layer dispatches on the action name
//!     → response.rs (success/failure envelope)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestId, RequestIdLayer, X_REQUEST_ID};
pub use response::{ErrorEnvelope, SuccessEnvelope};
pub use server::HttpServer;
