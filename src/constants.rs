// Fundamental configuration constants
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3030;
pub const WS_PATH: &str = "ws";

// Rooms hold exactly one peer pair by default
pub const DEFAULT_MAX_ROOM_SIZE: usize = 2;
