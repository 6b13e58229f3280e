//! Rust client for the Assistant Proxy.

pub mod client;

pub use client::{ActionEnvelope, ProxyClient};
