//! Server configuration module
//! Handles dynamic configuration parameters for the relay server

use crate::constants::{DEFAULT_HOST, DEFAULT_MAX_ROOM_SIZE, DEFAULT_PORT};
use crate::error::{RelayError, Result};
use std::env;

/// Server configuration parameters
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Maximum number of connections allowed in a single room
    pub max_room_size: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables if available
    pub fn from_env() -> Result<Self> {
        let host = env::var("PEER_RELAY_HOST").unwrap_or(DEFAULT_HOST.to_string());
        let port = env::var("PEER_RELAY_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let max_room_size = env::var("PEER_RELAY_MAX_ROOM_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MAX_ROOM_SIZE);

        if max_room_size == 0 {
            return Err(RelayError::ConfigError(
                "PEER_RELAY_MAX_ROOM_SIZE must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            host,
            port,
            max_room_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_defaults() {
        env::remove_var("PEER_RELAY_HOST");
        env::remove_var("PEER_RELAY_PORT");
        env::remove_var("PEER_RELAY_MAX_ROOM_SIZE");

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.max_room_size, DEFAULT_MAX_ROOM_SIZE);
    }
}
