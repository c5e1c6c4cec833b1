use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variables override the file, e.g. `RAIL_GATEWAY_DARWIN__TOKEN`.
pub const ENV_PREFIX: &str = "RAIL_GATEWAY";

pub const DEFAULT_CONFIG_PATH: &str = "config/gateway.yaml";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub darwin: DarwinConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
    /// Request header carrying the caller's Darwin access token.
    #[serde(default = "default_token_header")]
    pub token_header: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DarwinConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Used when a request carries no token of its own. Empty means none.
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_listen_address() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_token_header() -> String {
    "x-darwin-api".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_endpoint() -> String {
    "https://lite.realtime.nationalrail.co.uk/OpenLDBWS/ldb11.asmx".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            token_header: default_token_header(),
            log_level: default_log_level(),
        }
    }
}

impl Default for DarwinConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            token: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// Loads the optional YAML file at `path`, then applies environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("Failed to read configuration")?;

        settings
            .try_deserialize()
            .context("Failed to parse configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = AppConfig::load("does/not/exist.yaml").unwrap();

        assert_eq!(config.server.token_header, "x-darwin-api");
        assert_eq!(config.darwin.timeout_secs, 10);
        assert!(config.darwin.endpoint.ends_with("/OpenLDBWS/ldb11.asmx"));
    }

    #[test]
    fn test_load_yaml_file() {
        let path = std::env::temp_dir().join(format!("{}.yaml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            "server:\n  listen_address: \"127.0.0.1:8080\"\ndarwin:\n  timeout_secs: 3\n",
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.server.listen_address, "127.0.0.1:8080");
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.darwin.timeout_secs, 3);
        assert!(config.darwin.token.is_empty());
    }
}
