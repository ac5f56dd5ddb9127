use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use warp::{self, Filter};
use log::{error, info, warn};

use peer_relay::config::ServerConfig;
use peer_relay::constants::WS_PATH;
use peer_relay::core::relay::{Relay, SharedRelay};
use peer_relay::handlers::websocket::handle_ws_client;

#[tokio::main]
async fn main() {
    // Load .env before logger init so RUST_LOG set there takes effect
    let dotenv_result = dotenvy::dotenv();

    // Initialize logging
    env_logger::init();

    match dotenv_result {
        Ok(_) => info!("Environment variables loaded from .env file"),
        Err(e) => warn!("Failed to load .env file: {}", e),
    };

    // Load config from the environment
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Configuration: host={}, port={}, max_room_size={}",
        config.host, config.port, config.max_room_size
    );

    // Create the relay core
    let relay: SharedRelay = Arc::new(Relay::new(config.max_room_size));

    // Create WebSocket route
    let ws_route = warp::path(WS_PATH)
        .and(warp::ws())
        .and(with_relay(relay.clone()))
        .map(|ws: warp::ws::Ws, relay| {
            info!("New websocket connection");
            ws.on_upgrade(move |socket| handle_ws_client(socket, relay))
        });

    // Create health check route
    let health_route = warp::path("health").map(|| "OK");

    // Combine routes
    let routes = ws_route.or(health_route);

    // Build the server address
    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to parse server address: {}", e);
            std::process::exit(1);
        }
    };

    // Start the server
    info!("Starting Peer Relay server on {}", addr);

    warp::serve(routes).run(addr).await;
}

// Helper function to include the relay state in request handling
fn with_relay(relay: SharedRelay) -> impl Filter<Extract = (SharedRelay,), Error = Infallible> + Clone {
    warp::any().map(move || relay.clone())
}
