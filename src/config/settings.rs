//! Application settings and configuration structures.

use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

/// Upper bound for `sampling.recent_window_secs` (one day)
pub const MAX_RECENT_WINDOW_SECS: u64 = 86_400;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server configuration (host, port)
    pub server: ServerSettings,

    /// CORS configuration
    pub cors: CorsSettings,

    /// WebSocket push channel configuration
    pub websocket: WebSocketSettings,

    /// Alert sampling configuration
    pub sampling: SamplingSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Server binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to listen on
    pub port: u16,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins. An empty list allows any origin.
    pub allowed_origins: Vec<String>,
}

/// WebSocket configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebSocketSettings {
    /// Maximum inbound message size in bytes (default: 64KB)
    pub max_message_size: usize,

    /// Maximum inbound frame size in bytes (default: 16KB)
    pub max_frame_size: usize,

    /// Outgoing queue length per dashboard. A dashboard whose queue
    /// fills up is disconnected.
    pub outgoing_queue_capacity: usize,

    /// Upper bound for a single socket write in milliseconds
    pub send_timeout_ms: u64,

    /// Server ping interval in milliseconds (default: 30000)
    pub heartbeat_interval_ms: u64,

    /// Extra silence tolerated on top of the heartbeat interval
    pub heartbeat_grace_ms: u64,
}

/// Alert sampling configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SamplingSettings {
    /// Probability in [0, 1] that an accepted event triggers an alert
    pub alert_probability: f64,

    /// Alert severity label sent to dashboards
    pub alert_level: String,

    /// Human readable alert text
    pub alert_message: String,

    /// Window used to count recent visitors for the alert details
    pub recent_window_secs: u64,
}

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. Built-in defaults
    /// 2. config/default.toml (base configuration)
    /// 3. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 4. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        with_defaults(&environment)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // APP__SERVER__PORT=3000 -> server.port = 3000
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .build()?
            .try_deserialize::<Self>()
            .and_then(Self::validated)
    }

    /// Settings made only of the built-in defaults, ignoring files and
    /// environment variables.
    pub fn defaults() -> Result<Self, ConfigError> {
        with_defaults("development")?
            .build()?
            .try_deserialize::<Self>()
            .and_then(Self::validated)
    }

    fn validated(self) -> Result<Self, ConfigError> {
        let probability = self.sampling.alert_probability;
        if !(0.0..=1.0).contains(&probability) {
            return Err(ConfigError::Message(format!(
                "sampling.alert_probability must be within [0, 1], got {}",
                probability
            )));
        }
        if self.websocket.outgoing_queue_capacity == 0 {
            return Err(ConfigError::Message(
                "websocket.outgoing_queue_capacity must be at least 1".into(),
            ));
        }
        if self.websocket.heartbeat_interval_ms == 0 {
            return Err(ConfigError::Message(
                "websocket.heartbeat_interval_ms must be at least 1".into(),
            ));
        }
        let window = self.sampling.recent_window_secs;
        if !(1..=MAX_RECENT_WINDOW_SECS).contains(&window) {
            return Err(ConfigError::Message(format!(
                "sampling.recent_window_secs must be within [1, {}], got {}",
                MAX_RECENT_WINDOW_SECS, window
            )));
        }
        Ok(self)
    }

    /// Get the full server address as a string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn with_defaults(environment: &str) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("environment", environment)?
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3000)?
        .set_default("cors.allowed_origins", Vec::<String>::new())?
        .set_default("websocket.max_message_size", 65536_i64)? // 64KB
        .set_default("websocket.max_frame_size", 16384_i64)? // 16KB
        .set_default("websocket.outgoing_queue_capacity", 256_i64)?
        .set_default("websocket.send_timeout_ms", 5000_i64)?
        .set_default("websocket.heartbeat_interval_ms", 30000_i64)?
        .set_default("websocket.heartbeat_grace_ms", 10000_i64)?
        .set_default("sampling.alert_probability", 0.2)?
        .set_default("sampling.alert_level", "info")?
        .set_default("sampling.alert_message", "New visitor spike detected!")?
        .set_default("sampling.recent_window_secs", 60_i64)
}
