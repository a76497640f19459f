//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// GRID provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// API key. Falls back to the GRID_API_KEY environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Central catalog GraphQL endpoint
    #[serde(default = "default_central_url")]
    pub central_url: String,

    /// Live-state feed GraphQL endpoint
    #[serde(default = "default_live_state_url")]
    pub live_state_url: String,

    /// File-download REST base
    #[serde(default = "default_file_download_url")]
    pub file_download_url: String,

    /// Team statistics feed base
    #[serde(default = "default_stats_url")]
    pub stats_url: String,

    /// LoL title id in the central catalog
    #[serde(default = "default_title_id")]
    pub title_id: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Result cache time-to-live in seconds
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: u64,
}

fn default_central_url() -> String {
    "https://api.grid.gg/central-data/graphql".to_string()
}

fn default_live_state_url() -> String {
    "https://api.grid.gg/live-data-feed/series-state/graphql".to_string()
}

fn default_file_download_url() -> String {
    "https://api.grid.gg/file-download".to_string()
}

fn default_stats_url() -> String {
    "https://api.grid.gg/stats-feed-gateway/statistics".to_string()
}

fn default_title_id() -> String {
    "3".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_cache_ttl() -> u64 {
    300
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            central_url: default_central_url(),
            live_state_url: default_live_state_url(),
            file_download_url: default_file_download_url(),
            stats_url: default_stats_url(),
            title_id: default_title_id(),
            timeout_seconds: default_timeout(),
            cache_ttl_seconds: default_cache_ttl(),
        }
    }
}

impl GridConfig {
    /// Resolve the API key from config or environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("GRID_API_KEY").ok().filter(|k| !k.is_empty()))
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub grid: GridConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            grid: GridConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file when it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        if self.grid.cache_ttl_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Cache TTL must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.log_level, "info");
        assert_eq!(config.grid.cache_ttl_seconds, 300);
        assert_eq!(config.grid.timeout_seconds, 30);
        assert_eq!(config.server.port, 8080);
        assert!(config.grid.central_url.contains("central-data"));
    }

    #[test]
    fn test_config_validation_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_timeout() {
        let mut config = AppConfig::default();
        config.grid.timeout_seconds = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_ttl() {
        let mut config = AppConfig::default();
        config.grid.cache_ttl_seconds = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        // Should be parseable
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.grid.title_id, parsed.grid.title_id);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: AppConfig = toml::from_str(
            r#"
            log_level = "debug"

            [grid]
            api_key = "k-123"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.log_level, "debug");
        assert_eq!(parsed.grid.api_key.as_deref(), Some("k-123"));
        assert_eq!(parsed.grid.cache_ttl_seconds, 300);
        assert_eq!(parsed.server.port, 8080);
    }

    #[test]
    fn test_resolve_api_key_prefers_config() {
        let config = GridConfig {
            api_key: Some("from-config".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key().as_deref(), Some("from-config"));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config =
            AppConfig::load_or_default(Path::new("/definitely/not/here.toml")).unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            log_level = "warn"

            [grid]
            api_key = "file-key"
            cache_ttl_seconds = 120

            [server]
            port = 9090
            "#,
        )
        .unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.grid.api_key.as_deref(), Some("file-key"));
        assert_eq!(config.grid.cache_ttl_seconds, 120);
        assert_eq!(config.server.port, 9090);
    }

    #[test]
    fn test_from_file_rejects_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[grid]\ntimeout_seconds = 0\n").unwrap();

        assert!(matches!(
            AppConfig::from_file(&path),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
