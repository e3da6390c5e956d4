//! Application configuration loaded from environment variables.

use serde::Deserialize;

use crate::error::RelayError;
use crate::store::TimestampFormat;

/// Log output formats accepted in `LOG_FORMAT`.
pub const LOG_FORMATS: [&str; 2] = ["pretty", "json"];

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// Address to bind the HTTP listener to (IP or hostname).
    #[serde(default = "default_listen_host")]
    pub listen_host: String,

    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    // === Reports ===
    /// `chrono` layout used to render `updated_at`.
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,

    // === Observability ===
    /// Log level (trace, debug, info, warn, error) or a full filter directive.
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Log output format: `pretty` or `json`.
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Install the Prometheus recorder and expose `/metrics`.
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,
}

fn default_listen_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    21132
}

fn default_timestamp_format() -> String {
    TimestampFormat::EN_US.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_true() -> bool {
    true
}

fn invalid(reason: impl Into<String>) -> RelayError {
    RelayError::InvalidConfig(reason.into())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_host: default_listen_host(),
            port: default_port(),
            timestamp_format: default_timestamp_format(),
            rust_log: default_log_level(),
            log_format: default_log_format(),
            metrics_enabled: default_true(),
            verbose: false,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), RelayError> {
        if self.listen_host.trim().is_empty() {
            return Err(invalid("LISTEN_HOST must not be empty"));
        }

        if self.port == 0 {
            return Err(invalid("PORT must be between 1 and 65535"));
        }

        if !LOG_FORMATS.contains(&self.log_format.to_lowercase().as_str()) {
            return Err(invalid(format!(
                "LOG_FORMAT must be one of {:?}, got {:?}",
                LOG_FORMATS, self.log_format
            )));
        }

        self.timestamp_format()?;

        Ok(())
    }

    /// Parsed timestamp layout.
    pub fn timestamp_format(&self) -> Result<TimestampFormat, RelayError> {
        TimestampFormat::new(&self.timestamp_format)
            .map_err(|e| invalid(format!("TIMESTAMP_FORMAT is invalid: {}", e)))
    }

    /// Check if logs should be emitted as JSON lines.
    pub fn is_json_logging(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }

    /// `host:port` string for display.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.listen_host, self.port)
    }
}
