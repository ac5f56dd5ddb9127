pub mod connection;
pub mod event;
pub mod registry;
pub mod relay;
pub mod room;

pub use relay::{Relay, SharedRelay};
