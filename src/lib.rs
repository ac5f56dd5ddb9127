//! Peer Relay - a rendezvous and signaling relay server implemented in Rust
//!
//! This library provides the relay core: identity registration, bounded
//! rooms, payload forwarding, and the connection-request handshake. The
//! server never interprets the payloads it forwards.

pub mod config;
pub mod constants;
pub mod core;
pub mod error;
pub mod handlers;

// Re-export main components
pub use config::*;
pub use constants::*;
