//! Runtime configuration for the match server.

use once_cell::sync::Lazy;
use std::env;
use std::str::FromStr;

#[derive(Debug)]
pub struct Settings {
    /// Address the HTTP + WS listener binds to.
    pub server_addr: String,
    /// Simulation ticks per second.
    pub tick_rate: u32,
    pub map_width: f32,
    pub map_height: f32,
    /// Resources granted on join.
    pub start_memory: i32,
    pub start_cpu: i32,
    /// HS256 secret for session tokens. `None` runs the server in open mode.
    pub jwt_secret: Option<String>,
    /// Queued outbound messages per connection before frames are dropped.
    pub outbound_buffer: usize,
}

fn var_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl Settings {
    fn from_env() -> Self {
        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".into());
        let jwt_secret = env::var("JWT_SECRET").ok().filter(|s| !s.is_empty());

        Settings {
            server_addr,
            tick_rate: var_or("TICK_RATE", 60_u32).max(1),
            map_width: var_or("MAP_WIDTH", 800.0_f32),
            map_height: var_or("MAP_HEIGHT", 600.0_f32),
            start_memory: var_or("START_MEMORY", 200),
            start_cpu: var_or("START_CPU", 100),
            jwt_secret,
            outbound_buffer: var_or("OUTBOUND_BUFFER", 256_usize).max(1),
        }
    }
}

static SETTINGS: Lazy<Settings> = Lazy::new(Settings::from_env);

pub fn settings() -> &'static Settings {
    &SETTINGS
}
