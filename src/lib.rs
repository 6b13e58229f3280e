//! Assistant Platform HTTP Proxy Library

pub mod actions;
pub mod config;
pub mod error;
pub mod http;
pub mod observability;
pub mod security;
pub mod upstream;

pub use config::ProxyConfig;
pub use error::{ProxyError, ProxyResult};
pub use http::HttpServer;
