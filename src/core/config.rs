//! Configuration management for the tool server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables (optionally via a `.env` file) or
//! defaults. Both binaries load it the same way.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Main configuration structure for the tool server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Settings consumed by the utility operations themselves.
    pub tools: ToolsConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// External resources the utility operations read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Path of the user profile JSON file read by `user_information`.
    pub user_data_path: PathBuf,

    /// Directory holding `zone.tab` and `iso3166.tab`.
    pub zoneinfo_dir: PathBuf,

    /// Source of the public IP lookup (`http(s)://` or `file://`).
    pub ipinfo_url: String,

    /// Forecast page template; `{query}` is replaced by `lat=..&lon=..`.
    pub weather_url: String,

    /// Forced temperature unit ("celsius" / "fahrenheit"), if any.
    pub temperature_unit: Option<String>,

    /// Timeout for the IP lookup, in seconds.
    pub ip_lookup_timeout_secs: u64,

    /// Timeout for the weather page fetch, in seconds.
    pub weather_timeout_secs: u64,

    /// Timeout for system identity subprocesses, in seconds.
    pub command_timeout_secs: u64,
}

impl ToolsConfig {
    pub fn ip_lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.ip_lookup_timeout_secs)
    }

    pub fn weather_timeout(&self) -> Duration {
        Duration::from_secs(self.weather_timeout_secs)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            user_data_path: PathBuf::from("user.data.json"),
            zoneinfo_dir: PathBuf::from("/usr/share/zoneinfo"),
            ipinfo_url: "https://ipinfo.io/json".to_string(),
            weather_url: "https://forecast.weather.gov/MapClick.php?{query}".to_string(),
            temperature_unit: None,
            ip_lookup_timeout_secs: 10,
            weather_timeout_secs: 15,
            command_timeout_secs: 5,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "toolbox-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
            tools: ToolsConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`, `MCP_USER_DATA_PATH`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        config.tools = ToolsConfig::from_env();

        config
    }
}

impl ToolsConfig {
    /// Load the tool settings from `MCP_*` variables, keeping defaults for
    /// anything unset or unparseable.
    pub fn from_env() -> Self {
        let mut tools = Self::default();

        if let Ok(path) = std::env::var("MCP_USER_DATA_PATH") {
            tools.user_data_path = PathBuf::from(path);
            info!("User profile path: {:?}", tools.user_data_path);
        }

        if let Ok(dir) = std::env::var("MCP_ZONEINFO_DIR") {
            tools.zoneinfo_dir = PathBuf::from(dir);
        }

        if let Ok(url) = std::env::var("MCP_IPINFO_URL") {
            tools.ipinfo_url = url;
        }

        if let Ok(url) = std::env::var("MCP_WEATHER_URL") {
            // Fixed pages (e.g. file:// fixtures) take no query string.
            if !url.contains("{query}") {
                warn!("MCP_WEATHER_URL has no {{query}} placeholder; coordinates will be ignored");
            }
            tools.weather_url = url;
        }

        if let Ok(unit) = std::env::var("MCP_TEMPERATURE_UNIT") {
            let unit = unit.trim().to_lowercase();
            if !unit.is_empty() {
                tools.temperature_unit = Some(unit);
            }
        }

        if let Some(secs) = env_secs("MCP_HTTP_TIMEOUT_SECS") {
            tools.ip_lookup_timeout_secs = secs;
            tools.weather_timeout_secs = secs;
        }

        if let Some(secs) = env_secs("MCP_COMMAND_TIMEOUT_SECS") {
            tools.command_timeout_secs = secs;
        }

        tools
    }
}

fn env_secs(key: &str) -> Option<u64> {
    let raw = std::env::var(key).ok()?;
    match raw.parse::<u64>() {
        Ok(0) | Err(_) => {
            warn!("Ignoring invalid {}={:?}", key, raw);
            None
        }
        Ok(secs) => Some(secs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_tools_config_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_USER_DATA_PATH", "/tmp/profile.json");
            std::env::set_var("MCP_TEMPERATURE_UNIT", " Celsius ");
            std::env::set_var("MCP_HTTP_TIMEOUT_SECS", "3");
        }
        let tools = ToolsConfig::from_env();
        assert_eq!(tools.user_data_path, PathBuf::from("/tmp/profile.json"));
        assert_eq!(tools.temperature_unit.as_deref(), Some("celsius"));
        assert_eq!(tools.weather_timeout(), Duration::from_secs(3));
        assert_eq!(tools.ip_lookup_timeout(), Duration::from_secs(3));
        unsafe {
            std::env::remove_var("MCP_USER_DATA_PATH");
            std::env::remove_var("MCP_TEMPERATURE_UNIT");
            std::env::remove_var("MCP_HTTP_TIMEOUT_SECS");
        }
    }

    #[test]
    fn test_invalid_timeout_keeps_default() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_COMMAND_TIMEOUT_SECS", "soon");
        }
        let tools = ToolsConfig::from_env();
        assert_eq!(tools.command_timeout_secs, 5);
        unsafe {
            std::env::remove_var("MCP_COMMAND_TIMEOUT_SECS");
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.tools.ipinfo_url, "https://ipinfo.io/json");
        assert!(config.tools.weather_url.contains("{query}"));
        assert!(config.tools.temperature_unit.is_none());
    }
}
