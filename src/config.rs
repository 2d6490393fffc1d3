use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Dataset and summary file configuration
    #[serde(default)]
    pub data: DataConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/default.toml".to_string());

        config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(&config_path).required(false))
            // Override with environment variables (prefix: CDA_API)
            .add_source(
                config::Environment::with_prefix("CDA_API")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// Request timeout (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding the CDA dataset and the summary reports
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,

    /// CDA dataset file name, relative to `dir`
    #[serde(default = "default_cda_file")]
    pub cda_file: String,

    /// Build the record store and index at startup instead of on first use
    #[serde(default = "default_true")]
    pub preload: bool,

    /// Maximum number of summary blobs kept in memory
    #[serde(default = "default_summary_cache_capacity")]
    pub summary_cache_capacity: u64,

    /// Summary blob time-to-live (seconds); unset keeps blobs for the process lifetime
    #[serde(default)]
    pub summary_cache_ttl_secs: Option<u64>,
}

impl DataConfig {
    /// Full path of the CDA dataset
    pub fn cda_path(&self) -> PathBuf {
        self.dir.join(&self.cda_file)
    }

    pub fn summary_cache_ttl(&self) -> Option<Duration> {
        self.summary_cache_ttl_secs.map(Duration::from_secs)
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            cda_file: default_cda_file(),
            preload: default_true(),
            summary_cache_capacity: default_summary_cache_capacity(),
            summary_cache_ttl_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,

    /// Service name
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Enable Prometheus metrics
    #[serde(default = "default_true")]
    pub prometheus_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
            service_name: default_service_name(),
            prometheus_enabled: default_true(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8000
}

fn default_request_timeout() -> u64 {
    30
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_cda_file() -> String {
    "cdas.json".to_string()
}

fn default_summary_cache_capacity() -> u64 {
    32
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_service_name() -> String {
    "cda-api".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        assert_eq!(default_http_port(), 8000);
        assert_eq!(default_cda_file(), "cdas.json");
        assert_eq!(default_log_level(), "info");
        assert!(default_true());
    }

    #[test]
    fn test_cda_path_joins_dir_and_file() {
        let data = DataConfig {
            dir: PathBuf::from("/srv/lamdec"),
            ..Default::default()
        };
        assert_eq!(data.cda_path(), PathBuf::from("/srv/lamdec/cdas.json"));
        assert!(data.summary_cache_ttl().is_none());
    }

    #[test]
    fn test_embedded_defaults_parse() {
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.http_port, 8000);
        assert!(config.data.preload);
        assert_eq!(config.observability.service_name, "cda-api");
    }
}
