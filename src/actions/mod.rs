//! Action handling subsystem.
//!
//! # Data Flow
//! ```text
//! POST / body
//!     → types.rs (envelope + payload deserialization)
//!     → router.rs (action name → handler)
//!     → chat.rs / search.rs / assistants.rs / files.rs
//!     → upstream call via the dispatcher
//!     → shaped result, wrapped in the success envelope by the server
//! ```

pub mod assistants;
pub mod chat;
pub mod files;
pub mod router;
pub mod search;
pub mod types;

pub use router::{dispatch_action, SUPPORTED_ACTIONS};
pub use types::{ChatMessage, ProxyRequest};
