//! Upstream integration subsystem.
//!
//! # Data Flow
//! ```text
//! action handler
//!     → resolve.rs (assistant name → base URL, cached with TTL)
//!     → dispatch.rs (build wire request, inject auth headers)
//!     → [429? retry with backoff.rs delay]
//!     → response returned, or enriched Upstream error
//! ```

pub mod backoff;
pub mod cache;
pub mod dispatch;
pub mod resolve;

pub use cache::{Clock, HostEntry, HostStore, MemoryHostStore, SystemClock};
pub use dispatch::{Dispatcher, OutboundRequest};
pub use resolve::{normalize_assistant_base, HostResolver};
